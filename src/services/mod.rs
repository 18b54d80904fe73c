//! Services module
//!
//! Colaboradores externos detrás de traits (pasarela de pago, email,
//! directorio de usuarios) y el lote de recordatorios de vencimiento.

pub mod email_service;
pub mod expiry_notifier;
pub mod payment_gateway;
pub mod user_directory;

pub use email_service::{EmailMessage, EmailSender, RecordingEmailSender, ResendEmailSender};
pub use expiry_notifier::{ExpiryNotifier, ExpiryReport};
pub use payment_gateway::{
    CheckoutRequest, CheckoutSession, MockPaymentGateway, PaymentGateway, SessionStatus,
    StripeGateway,
};
pub use user_directory::{ClerkUserDirectory, StaticUserDirectory, UserContact, UserDirectory};
