//! Shared monthly-payment value visible to other regions of the UI.
//!
//! The cell has exactly one writer, the form controller, and any number of
//! passive readers such as the header badge. The writer half is not `Clone`
//! so a second writer cannot appear by accident.

use std::sync::{Arc, RwLock};

#[derive(Debug, Default)]
struct Slot {
    value: Option<f64>,
}

/// Creates a connected writer/reader pair with an empty value.
///
/// # Examples
///
/// ```
/// use loancalc::application::shared_payment;
///
/// let (publisher, reader) = shared_payment();
/// assert_eq!(reader.get(), None);
///
/// publisher.publish(Some(1234.5));
/// assert_eq!(reader.get(), Some(1234.5));
/// ```
pub fn shared_payment() -> (PaymentPublisher, PaymentReader) {
    let slot = Arc::new(RwLock::new(Slot::default()));
    (PaymentPublisher { slot: slot.clone() }, PaymentReader { slot })
}

/// The single setter of the shared payment value.
#[derive(Debug)]
pub struct PaymentPublisher {
    slot: Arc<RwLock<Slot>>,
}

impl PaymentPublisher {
    /// Replaces the value. Last writer wins.
    pub fn publish(&self, value: Option<f64>) {
        // A poisoned lock still holds a valid Option<f64>.
        let mut slot = self.slot.write().unwrap_or_else(|e| e.into_inner());
        slot.value = value;
    }

    pub fn clear(&self) {
        self.publish(None);
    }

    /// Returns a new reader attached to the same value.
    pub fn reader(&self) -> PaymentReader {
        PaymentReader { slot: self.slot.clone() }
    }
}

/// Read-only handle to the shared payment value.
#[derive(Debug, Clone)]
pub struct PaymentReader {
    slot: Arc<RwLock<Slot>>,
}

impl PaymentReader {
    pub fn get(&self) -> Option<f64> {
        self.slot.read().unwrap_or_else(|e| e.into_inner()).value
    }
}
