//! PCI address normalization
//!
//! Controller tools report PCI addresses in a loose form ("59:0:0.0",
//! "0:2:14.0") while the kernel's by-path symlinks spell them fully
//! padded ("0059:00:00.0"). Normalization rewrites the loose form into
//! the padded one so the two can be joined by string equality.

/// Normalizes a PCI address to the kernel's padded spelling.
///
/// The address is split on `:` and `.`; when that yields exactly four
/// decimal integers they are re-rendered as
/// `domain(4):bus(2):device(2).function`. Anything else, including
/// hex-lettered components, is returned unchanged. The function is
/// idempotent: a padded decimal address re-renders to itself.
pub fn normalize_pci_address(address: &str) -> String {
    let parts: Vec<&str> = address.split([':', '.']).collect();
    if parts.len() != 4 {
        return address.to_string();
    }
    let mut values = [0u32; 4];
    for (slot, part) in values.iter_mut().zip(&parts) {
        match part.parse::<u32>() {
            Ok(v) => *slot = v,
            Err(_) => return address.to_string(),
        }
    }
    format!(
        "{:04}:{:02}:{:02}.{}",
        values[0], values[1], values[2], values[3]
    )
}
