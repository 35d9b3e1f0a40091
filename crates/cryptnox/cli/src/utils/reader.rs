use std::error::Error;

use cryptnox_apdu_transport_pcsc::{PcscDeviceManager, PcscError, PcscReader};

use super::display;

/// Card state of a reader, as shown by `list`
fn describe(reader: &PcscReader) -> &'static str {
    if reader.has_storage_tag() {
        "storage tag, UID only"
    } else if reader.has_card() {
        "card present"
    } else {
        "empty"
    }
}

/// Print every reader with the state of its slot
pub fn list_readers(manager: &PcscDeviceManager) -> Result<(), Box<dyn Error>> {
    let readers = match manager.list_readers() {
        Ok(readers) => readers,
        Err(PcscError::NoReadersAvailable) => {
            println!("{}", display::warning("No readers found"));
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let items: Vec<_> = readers
        .iter()
        .map(|reader| (reader.name(), describe(reader).to_string()))
        .collect();
    println!("{}", display::key_value_box("Readers", &items));

    Ok(())
}
