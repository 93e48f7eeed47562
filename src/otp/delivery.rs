use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::info;

/// Delivery channel for issued codes. Production wires an SMS gateway
/// implementation here with credentials taken from runtime configuration;
/// the core never sees the transport.
#[async_trait]
pub trait OtpDelivery: Send + Sync {
    async fn deliver(&self, phone: &str, code: &str) -> anyhow::Result<()>;
}

/// Development sink: writes the code to the log instead of sending an SMS.
pub struct LogDelivery;

#[async_trait]
impl OtpDelivery for LogDelivery {
    async fn deliver(&self, phone: &str, code: &str) -> anyhow::Result<()> {
        info!(phone = %phone, code = %code, "otp code issued (log delivery)");
        Ok(())
    }
}

/// Test double: records every delivered code so the suites can read back
/// what would have gone out over SMS.
#[derive(Default)]
pub struct CaptureDelivery {
    pub sent: Mutex<Vec<(String, String)>>,
}

impl CaptureDelivery {
    pub async fn last_code_for(&self, phone: &str) -> Option<String> {
        self.sent
            .lock()
            .await
            .iter()
            .rev()
            .find(|(p, _)| p == phone)
            .map(|(_, code)| code.clone())
    }
}

#[async_trait]
impl OtpDelivery for CaptureDelivery {
    async fn deliver(&self, phone: &str, code: &str) -> anyhow::Result<()> {
        self.sent
            .lock()
            .await
            .push((phone.to_string(), code.to_string()));
        Ok(())
    }
}
