//! SMTP notifier adapter.
//!
//! Implements [`NotifierPort`] on top of `lettre`'s blocking
//! [`SmtpTransport`].  The transport is configured once at startup; each
//! send opens a connection to the relay, bounded by `smtp.timeout_secs`.
//!
//! Negative replies are folded into [`TransportError`] by reply code so
//! the service can tell an unreachable relay from a refused recipient in
//! its logs.  The adapter never retries.

use std::time::Duration;

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use log::{debug, info};

use crate::app::alert::OutgoingMail;
use crate::app::ports::{NotifierPort, TransportError};
use crate::config::SmtpConfig;

pub struct SmtpNotifier {
    transport: SmtpTransport,
    relay: String,
}

impl SmtpNotifier {
    pub fn new(config: &SmtpConfig) -> Result<Self, TransportError> {
        let builder = if config.starttls {
            SmtpTransport::starttls_relay(&config.host)
                .map_err(|e| TransportError::Unreachable(e.to_string()))?
        } else {
            SmtpTransport::builder_dangerous(&config.host)
        };
        let mut builder = builder
            .port(config.port)
            .timeout(Some(Duration::from_secs(config.timeout_secs)));
        if let (Some(user), Some(pass)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let relay = format!("{}:{}", config.host, config.port);
        info!(
            "SMTP: relay {} (starttls={}, auth={})",
            relay,
            config.starttls,
            config.username.is_some()
        );
        Ok(Self {
            transport: builder.build(),
            relay,
        })
    }
}

impl NotifierPort for SmtpNotifier {
    fn send(&mut self, mail: &OutgoingMail) -> Result<(), TransportError> {
        let message = build_message(mail)?;
        debug!("SMTP: sending '{}' via {}", mail.subject, self.relay);
        self.transport
            .send(&message)
            .map(|_| ())
            .map_err(|e| classify(&e))
    }
}

fn mailbox(addr: &str) -> Result<Mailbox, TransportError> {
    addr.parse::<Mailbox>()
        .map_err(|e| TransportError::InvalidAddress(format!("{addr}: {e}")))
}

/// Turn an [`OutgoingMail`] into a plain-text RFC 5322 message.
pub fn build_message(mail: &OutgoingMail) -> Result<Message, TransportError> {
    let mut builder = Message::builder()
        .from(mailbox(&mail.from)?)
        .reply_to(mailbox(&mail.reply_to)?)
        .subject(mail.subject.clone())
        .header(ContentType::TEXT_PLAIN)
        .date_now();
    for to in &mail.to {
        builder = builder.to(mailbox(to)?);
    }
    builder
        .body(mail.body.clone())
        .map_err(|e| TransportError::Rejected(format!("message could not be built: {e}")))
}

fn classify(err: &lettre::transport::smtp::Error) -> TransportError {
    let detail = err.to_string();
    match err.status().and_then(|code| code.to_string().parse::<u16>().ok()) {
        None => TransportError::Unreachable(detail),
        Some(code) => classify_reply(code, detail),
    }
}

/// Map an SMTP reply code onto the transport error taxonomy.
pub fn classify_reply(code: u16, detail: String) -> TransportError {
    match code {
        421 => TransportError::Unreachable(detail),
        530 | 534 | 535 | 538 => TransportError::AuthRejected(detail),
        450 | 550 | 551 | 553 => TransportError::RecipientRejected(detail),
        _ => TransportError::Rejected(detail),
    }
}
