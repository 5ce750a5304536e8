//! WhatsApp checkout handoff.
//!
//! Checkout is a deep link: the cart is rendered as a text message and
//! appended to a `wa.me` URL for the store's phone number. Everything here
//! is a pure string transform; opening the link is up to the host.

use std::fmt::Write;

use vitrina_core::Cart;

/// Greeting that opens every checkout message.
pub const DEFAULT_GREETING: &str = "Hola, quiero comprar los siguientes productos:";

/// Deep link base for the messaging app.
const WHATSAPP_BASE_URL: &str = "https://wa.me";

/// Render the plain-text checkout message for `cart`.
///
/// Returns an empty string for an empty cart.
#[must_use]
pub fn checkout_message(cart: &Cart, greeting: &str) -> String {
    if cart.is_empty() {
        return String::new();
    }

    let mut message = format!("{greeting}\n\n");
    for line in cart.lines() {
        // Writing to a String cannot fail
        let _ = writeln!(
            message,
            "- {} x{} ({})",
            line.product.name, line.quantity, line.product.price
        );
    }
    let _ = write!(message, "\nTotal: {}", cart.total_price());
    message
}

/// Render the percent-encoded checkout payload for `cart`.
///
/// Returns an empty string for an empty cart, which callers must treat as
/// "nothing to send".
#[must_use]
pub fn checkout_payload(cart: &Cart, greeting: &str) -> String {
    let message = checkout_message(cart, greeting);
    if message.is_empty() {
        return message;
    }
    urlencoding::encode(&message).into_owned()
}

/// Build the deep link for an encoded payload.
///
/// Returns `None` when the payload is empty.
#[must_use]
pub fn checkout_url(phone: &str, payload: &str) -> Option<String> {
    if payload.is_empty() {
        return None;
    }
    Some(format!("{WHATSAPP_BASE_URL}/{phone}?text={payload}"))
}
