//! Cryptnox application interface
//!
//! [`Cryptnox`] drives the secure channel handshake over any [`CardTransport`]:
//! SELECT, GET CARD CERTIFICATE, OPEN SECURE CHANNEL, then the local ECDH that
//! completes mutual authentication.

use bytes::Bytes;
use cryptnox_apdu_core::prelude::*;
use tracing::{debug, info};

use crate::certificate::Certificate;
use crate::commands::{GetCardCertificateCommand, OpenSecureChannelCommand, SelectCommand};
use crate::constants::{NONCE_LEN, SALT_LEN};
use crate::crypto::{self, EphemeralKeypair, SharedSecret};
use crate::diagnostics::{Diagnostics, TracingDiagnostics};
use crate::entropy::EntropySource;
use crate::error::{HandshakeError, Result};
use crate::handshake::{HandshakeConfig, HandshakeState, HandshakeStep};
use crate::session::Session;

/// What [`Cryptnox::process_card`] found in the field
#[derive(Debug)]
pub enum CardOutcome {
    /// Handshake completed
    Authenticated(Box<Session>),
    /// A card was present but the handshake failed
    Failed(HandshakeError),
    /// A tag without APDU support, identified by its UID
    Uid(Bytes),
    /// Nothing usable in the field
    NoCard(TransportError),
}

impl CardOutcome {
    /// Whether the handshake completed
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

/// Cryptnox card reachable over a transport
#[derive(Debug)]
pub struct Cryptnox<T: CardTransport, D: Diagnostics = TracingDiagnostics> {
    /// Link to the card
    transport: T,
    /// Sink for handshake events
    diagnostics: D,
    /// Applet and curve to use
    config: HandshakeConfig,
    /// Progress of the latest handshake
    state: HandshakeState,
}

impl<T: CardTransport> Cryptnox<T> {
    /// Wrap a transport, reporting events through `tracing`
    pub fn new(transport: T) -> Self {
        Self::with_diagnostics(transport, TracingDiagnostics)
    }
}

impl<T: CardTransport, D: Diagnostics> Cryptnox<T, D> {
    /// Wrap a transport with a specific diagnostics sink
    pub fn with_diagnostics(transport: T, diagnostics: D) -> Self {
        Self {
            transport,
            diagnostics,
            config: HandshakeConfig::default(),
            state: HandshakeState::Idle,
        }
    }

    /// Replace the handshake configuration
    pub fn with_config(mut self, config: HandshakeConfig) -> Self {
        self.config = config;
        self
    }

    /// Handshake configuration in use
    pub const fn config(&self) -> &HandshakeConfig {
        &self.config
    }

    /// State reached by the latest handshake
    pub const fn state(&self) -> HandshakeState {
        self.state
    }

    /// Underlying transport
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Underlying transport, mutably
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Diagnostics sink
    pub const fn diagnostics(&self) -> &D {
        &self.diagnostics
    }

    /// Give the transport back
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Run the full handshake and return the resulting session
    ///
    /// The challenge and the client ephemeral key are drawn from `rng`. Every call
    /// starts over from [`HandshakeState::Idle`]; the first failing step ends the
    /// attempt and leaves the state at [`HandshakeState::Failed`].
    pub fn handshake<R: EntropySource + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> std::result::Result<Session, HandshakeError> {
        self.state = HandshakeState::Idle;
        debug!(
            aid = %hex::encode_upper(&self.config.aid),
            curve = %self.config.curve,
            "Starting handshake"
        );

        let result = self.select_application();
        self.advance(HandshakeStep::Select, result)?;

        let mut nonce = [0u8; NONCE_LEN];
        rng.fill_random(&mut nonce);
        let result = self.get_card_certificate(&nonce);
        let certificate = self.advance(HandshakeStep::GetCertificate, result)?;

        let result = self.open_secure_channel(rng);
        let (client_keypair, salt) = self.advance(HandshakeStep::OpenSecureChannel, result)?;

        let result = self.mutually_authenticate(&certificate, &client_keypair);
        let shared_secret = self.advance(HandshakeStep::MutualAuthenticate, result)?;

        info!("Secure channel established");
        Ok(Session::new(
            client_keypair,
            certificate,
            nonce,
            salt,
            shared_secret,
        ))
    }

    /// Run the handshake, reporting only whether it completed
    pub fn try_handshake<R: EntropySource + ?Sized>(&mut self, rng: &mut R) -> bool {
        self.handshake(rng).is_ok()
    }

    /// Deal with whatever is in the field
    ///
    /// An APDU-capable card gets the full handshake. Otherwise the transport is
    /// asked for the UID of a simpler tag.
    pub fn process_card<R: EntropySource + ?Sized>(&mut self, rng: &mut R) -> CardOutcome {
        if self.transport.is_card_present() {
            return match self.handshake(rng) {
                Ok(session) => CardOutcome::Authenticated(Box::new(session)),
                Err(e) => CardOutcome::Failed(e),
            };
        }

        match self.transport.read_uid() {
            Ok(uid) => {
                self.diagnostics.uid_read(&uid);
                CardOutcome::Uid(uid)
            }
            Err(e) => {
                debug!(error = %e, "Nothing in the field");
                CardOutcome::NoCard(e)
            }
        }
    }

    /// Record the outcome of `step`
    fn advance<V>(
        &mut self,
        step: HandshakeStep,
        result: Result<V>,
    ) -> std::result::Result<V, HandshakeError> {
        match result {
            Ok(value) => {
                self.state = step.completes();
                self.diagnostics.step_completed(step);
                Ok(value)
            }
            Err(source) => {
                let reached = self.state;
                self.state = HandshakeState::Failed;
                self.diagnostics.step_failed(step, &source);
                debug!(%step, %reached, error = %source, "Handshake aborted");
                Err(HandshakeError {
                    step,
                    reached,
                    source,
                })
            }
        }
    }

    /// Send one command and return the raw answer
    fn exchange(
        &mut self,
        step: HandshakeStep,
        command: &Command,
        max_response_len: usize,
    ) -> Result<Bytes> {
        let apdu = command.to_bytes();
        self.diagnostics.command_sent(step, &apdu);

        let response = self.transport.exchange(&apdu, max_response_len)?;
        self.diagnostics.response_received(step, &response);
        if let Ok((status, _)) = utils::extract_status_and_payload(&response) {
            self.diagnostics.status_word(step, status);
        }

        Ok(response)
    }

    fn select_application(&mut self) -> Result<()> {
        let command = SelectCommand::with_aid(&self.config.aid)?;
        let response = self.exchange(
            HandshakeStep::Select,
            &command,
            SelectCommand::MAX_RESPONSE_LEN,
        )?;
        let data = SelectCommand::parse_response(&response)?;
        debug!(data = %hex::encode(&data), "Applet selected");
        Ok(())
    }

    fn get_card_certificate(&mut self, nonce: &[u8; NONCE_LEN]) -> Result<Certificate> {
        let command = GetCardCertificateCommand::with_nonce(nonce)?;
        let response = self.exchange(
            HandshakeStep::GetCertificate,
            &command,
            GetCardCertificateCommand::MAX_RESPONSE_LEN,
        )?;
        let certificate = GetCardCertificateCommand::parse_response(&response)?;

        if certificate.nonce() != nonce {
            // The echoed nonce is informational only
            debug!(
                sent = %hex::encode(nonce),
                echoed = %hex::encode(certificate.nonce()),
                "Certificate nonce differs from challenge"
            );
        }
        Ok(certificate)
    }

    fn open_secure_channel<R: EntropySource + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<(EphemeralKeypair, [u8; SALT_LEN])> {
        let keypair = crypto::generate_keypair(self.config.curve, rng)?;

        let command = OpenSecureChannelCommand::with_public_key(keypair.public_key())?;
        let response = self.exchange(
            HandshakeStep::OpenSecureChannel,
            &command,
            OpenSecureChannelCommand::MAX_RESPONSE_LEN,
        )?;
        let salt = OpenSecureChannelCommand::parse_response(&response)?;

        Ok((keypair, salt))
    }

    fn mutually_authenticate(
        &self,
        certificate: &Certificate,
        client_keypair: &EphemeralKeypair,
    ) -> Result<SharedSecret> {
        let card_key = certificate.ephemeral_key().trimmed();
        crypto::compute_shared_secret(card_key, &client_keypair.private_key(), self.config.curve)
    }
}
