use std::sync::Arc;

use anyhow::{Context, Result};
use lettre::{
    message::Mailbox,
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{debug, info, warn};

use shared_config::AppConfig;

use crate::models::BookingEmailContext;

/// Outbound transactional email over SMTP with STARTTLS. Sends are
/// fire-and-forget from the request path via the `spawn_*` helpers.
#[derive(Clone)]
pub struct Mailer {
    config: Arc<AppConfig>,
}

impl Mailer {
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self { config }
    }

    /// Send one plain-text email. Returns `Ok(false)` without sending when
    /// email is disabled, incomplete, or the recipient is empty.
    pub async fn send(&self, to: Option<&str>, subject: &str, body: &str) -> Result<bool> {
        let Some(to) = to.map(str::trim).filter(|t| !t.is_empty()) else {
            return Ok(false);
        };
        if !self.config.is_email_configured() {
            debug!("Email not configured; skipping \"{}\"", subject);
            return Ok(false);
        }

        let message = Message::builder()
            .from(
                self.config
                    .from_email
                    .parse::<Mailbox>()
                    .context("Invalid FROM_EMAIL")?,
            )
            .to(to.parse::<Mailbox>().context("Invalid recipient address")?)
            .subject(subject)
            .body(body.to_string())?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)?
            .port(self.config.smtp_port)
            .credentials(Credentials::new(
                self.config.smtp_user.clone(),
                self.config.smtp_pass.clone(),
            ))
            .build();

        transport.send(message).await.context("SMTP send failed")?;
        info!("Email sent: {}", subject);
        Ok(true)
    }

    async fn send_customer(&self, ctx: &BookingEmailContext, subject: &str, body: &str) -> Result<bool> {
        if !self.config.send_customer_notifications {
            return Ok(false);
        }
        self.send(ctx.recipient(), subject, body).await
    }

    pub async fn send_booking_confirmation(&self, ctx: &BookingEmailContext) -> Result<bool> {
        let subject = format!("Your {} appointment is booked!", self.config.salon_name);
        let body = confirmation_body(ctx, &self.config.salon_name, &self.config.salon_address);
        self.send_customer(ctx, &subject, &body).await
    }

    pub async fn send_cancellation_notice(&self, ctx: &BookingEmailContext) -> Result<bool> {
        let subject = format!("{}: Your appointment was cancelled", self.config.salon_name);
        let body = cancellation_body(ctx, &self.config.salon_name, &self.config.salon_address);
        self.send_customer(ctx, &subject, &body).await
    }

    pub async fn send_thanks_note(&self, ctx: &BookingEmailContext) -> Result<bool> {
        let subject = format!("Thanks for visiting {}!", self.config.salon_name);
        let body = thanks_body(ctx, &self.config.salon_name, &self.config.salon_address);
        self.send_customer(ctx, &subject, &body).await
    }

    pub fn spawn_booking_confirmation(&self, ctx: BookingEmailContext) {
        let mailer = self.clone();
        tokio::spawn(async move {
            if let Err(e) = mailer.send_booking_confirmation(&ctx).await {
                warn!("Booking confirmation email failed: {}", e);
            }
        });
    }

    pub fn spawn_cancellation_notice(&self, ctx: BookingEmailContext) {
        let mailer = self.clone();
        tokio::spawn(async move {
            if let Err(e) = mailer.send_cancellation_notice(&ctx).await {
                warn!("Cancellation email failed: {}", e);
            }
        });
    }

    pub fn spawn_thanks_note(&self, ctx: BookingEmailContext) {
        let mailer = self.clone();
        tokio::spawn(async move {
            if let Err(e) = mailer.send_thanks_note(&ctx).await {
                warn!("Thanks email failed: {}", e);
            }
        });
    }
}

fn confirmation_body(ctx: &BookingEmailContext, salon_name: &str, salon_address: &str) -> String {
    [
        format!("Hi {},", ctx.greeting_name()),
        String::new(),
        "Thanks for booking with us. Here are your details:".to_string(),
        format!("• {}", ctx.appointment_line()),
        String::new(),
        "If you need to make changes, just reply to this email.".to_string(),
        String::new(),
        "See you soon,".to_string(),
        salon_name.to_string(),
        salon_address.to_string(),
    ]
    .join("\n")
}

fn cancellation_body(ctx: &BookingEmailContext, salon_name: &str, salon_address: &str) -> String {
    [
        format!("Hi {},", ctx.greeting_name()),
        String::new(),
        "Your appointment has been cancelled:".to_string(),
        format!("• {}", ctx.appointment_line()),
        String::new(),
        "If this was unexpected or you'd like to rebook, just reply to this email.".to_string(),
        String::new(),
        format!("— {}", salon_name),
        salon_address.to_string(),
    ]
    .join("\n")
}

fn thanks_body(ctx: &BookingEmailContext, salon_name: &str, salon_address: &str) -> String {
    [
        format!("Hi {},", ctx.greeting_name()),
        String::new(),
        "Thanks for coming in today — we hope you loved your service!".to_string(),
        format!("• {}", ctx.appointment_line()),
        String::new(),
        "If there's anything we can do better, just reply to this email.".to_string(),
        String::new(),
        "Can't wait to see you again,".to_string(),
        salon_name.to_string(),
        salon_address.to_string(),
    ]
    .join("\n")
}
