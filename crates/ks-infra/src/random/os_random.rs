use ks_core::ports::RandomSourcePort;
use rand::rngs::OsRng;
use rand::TryRngCore;
use tracing::warn;

/// Random bits from the operating system CSPRNG.
pub struct OsRandomSource;

impl RandomSourcePort for OsRandomSource {
    fn secure_bit(&self) -> Option<bool> {
        match OsRng.try_next_u32() {
            Ok(value) => Some(value & 1 == 1),
            Err(err) => {
                warn!(error = %err, "OS random source unavailable");
                None
            }
        }
    }
}

/// Deterministic source for tests and scripted runs. `None` simulates a
/// platform without a secure generator.
#[derive(Debug, Clone, Copy)]
pub struct FixedRandomSource(pub Option<bool>);

impl RandomSourcePort for FixedRandomSource {
    fn secure_bit(&self) -> Option<bool> {
        self.0
    }
}
