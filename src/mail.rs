//! # Email
//!
//! Confirmation and alert delivery over SMTP.
//!
//! Sends are fire-and-forget: the request path hands the message to a
//! detached task and returns immediately. Failures are logged at warn and
//! dropped, never retried, and never surfaced to the caller.
use lettre::{
    Message, SmtpTransport, Transport,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use tracing::warn;

use crate::{config::Config, database::Registration};

#[derive(Clone)]
pub struct Mailer {
    transport: SmtpTransport,
    from: Mailbox,
    /// Internal alerts and contact-form messages land here.
    inbox: Mailbox,
    app_url: String,
}

impl Mailer {
    /// Returns `None` when SMTP credentials are absent or unusable; every
    /// send upstream becomes a no-op.
    pub fn from_config(config: &Config) -> Option<Self> {
        let smtp = config.smtp.as_ref()?;

        let transport = match SmtpTransport::relay(&smtp.host) {
            Ok(builder) => builder
                .port(smtp.port)
                .credentials(Credentials::new(smtp.user.clone(), smtp.pass.clone()))
                .build(),
            Err(e) => {
                warn!("Invalid SMTP relay {}: {e}", smtp.host);
                return None;
            }
        };

        let mailbox: Mailbox = match smtp.user.parse() {
            Ok(mailbox) => mailbox,
            Err(e) => {
                warn!("SMTP_USER is not a mail address: {e}");
                return None;
            }
        };

        Some(Self {
            transport,
            from: mailbox.clone(),
            inbox: mailbox,
            app_url: config.app_url.clone(),
        })
    }

    pub fn send_confirmation(&self, registration: &Registration, qr_data_uri: &str) {
        let to: Mailbox = match registration.email.parse() {
            Ok(to) => to,
            Err(e) => {
                warn!("Invalid recipient address: {e}");
                return;
            }
        };

        let html = format!(
            "<h1>Registration Successful!</h1>\
             <p>Hi {},</p>\
             <p>You have successfully registered for VELONIX'2K26.</p>\
             <p><strong>Registration ID:</strong> {}</p>\
             <p><strong>College:</strong> {}</p>\
             <p><strong>Events:</strong> {}</p>\
             <p><strong>Transaction ID:</strong> {}</p>\
             <p>Please show the QR code below at the registration desk on the event day.</p>\
             <img src=\"{qr_data_uri}\" alt=\"QR Code Ticket\" />",
            registration.full_name,
            registration.id,
            registration.college_name,
            registration.selected_events,
            registration.transaction_id,
        );

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject("Registration Confirmed - VELONIX'2K26")
            .header(ContentType::TEXT_HTML)
            .body(html);

        match message {
            Ok(message) => self.dispatch(message),
            Err(e) => warn!("Failed to build confirmation email: {e}"),
        }
    }

    pub fn send_admin_alert(&self, registration: &Registration) {
        let html = format!(
            "<h2>New Registration Received</h2>\
             <p><strong>Name:</strong> {}</p>\
             <p><strong>College:</strong> {}</p>\
             <p><strong>Events:</strong> {}</p>\
             <p><strong>Transaction ID:</strong> {}</p>\
             <p><a href=\"{}{}\">View Payment Screenshot</a></p>",
            registration.full_name,
            registration.college_name,
            registration.selected_events,
            registration.transaction_id,
            self.app_url,
            registration.screenshot_path,
        );

        let message = Message::builder()
            .from(self.from.clone())
            .to(self.inbox.clone())
            .subject(format!("New Registration Alert - {}", registration.id))
            .header(ContentType::TEXT_HTML)
            .body(html);

        match message {
            Ok(message) => self.dispatch(message),
            Err(e) => warn!("Failed to build alert email: {e}"),
        }
    }

    pub fn send_contact_message(&self, name: &str, email: &str, body: &str) {
        let text = format!("Name: {name}\nEmail: {email}\nMessage: {body}");

        let message = Message::builder()
            .from(self.from.clone())
            .to(self.inbox.clone())
            .subject(format!("Contact Form Submission from {name}"))
            .header(ContentType::TEXT_PLAIN)
            .body(text);

        match message {
            Ok(message) => self.dispatch(message),
            Err(e) => warn!("Failed to build contact email: {e}"),
        }
    }

    /// Hands the message to a detached task; the caller never waits on it.
    fn dispatch(&self, message: Message) {
        let transport = self.transport.clone();

        tokio::spawn(async move {
            match tokio::task::spawn_blocking(move || transport.send(&message)).await {
                Ok(Ok(_)) => {}
                Ok(Err(e)) => warn!("Failed to send email: {e}"),
                Err(e) => warn!("Email task failed: {e}"),
            }
        });
    }
}
