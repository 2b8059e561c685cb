use std::sync::Arc;

use tracing::{info, warn};

use ks_core::onboarding::keys::ONBOARDING_VARIANT_KEY;
use ks_core::ports::{ClockPort, KeyValueStorePort, RandomSourcePort};
use ks_core::Variant;

/// Use case for obtaining the device's A/B bucket.
///
/// The bucket is drawn once and persisted; later calls return the stored
/// value unchanged. The draw is a fair coin from the OS random source. When
/// that source is unavailable the parity of the wall clock is used instead.
/// That fallback is predictable, which is acceptable here: the bucket only
/// selects a flow shape and carries no security weight.
pub struct AssignVariant {
    store: Arc<dyn KeyValueStorePort>,
    random: Arc<dyn RandomSourcePort>,
    clock: Arc<dyn ClockPort>,
}

impl AssignVariant {
    pub fn new(
        store: Arc<dyn KeyValueStorePort>,
        random: Arc<dyn RandomSourcePort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            store,
            random,
            clock,
        }
    }

    /// Returns the persisted variant, assigning and persisting one if needed.
    pub async fn get_or_assign(&self) -> Variant {
        match self.store.get(ONBOARDING_VARIANT_KEY).await {
            Ok(Some(raw)) => match raw.trim().parse::<Variant>() {
                Ok(variant) => return variant,
                Err(err) => {
                    warn!(error = %err, "stored onboarding variant is invalid, reassigning")
                }
            },
            Ok(None) => {}
            Err(err) => {
                // The stored value may still be fine; do not overwrite it on a read failure.
                warn!(error = %err, "failed to read onboarding variant, using a transient draw");
                return self.draw();
            }
        }

        let variant = self.draw();
        match self.store.set(ONBOARDING_VARIANT_KEY, variant.as_str()).await {
            Ok(()) => info!(variant = %variant, "onboarding variant assigned"),
            Err(err) => {
                warn!(error = %err, variant = %variant, "failed to persist onboarding variant")
            }
        }
        variant
    }

    fn draw(&self) -> Variant {
        let bit = match self.random.secure_bit() {
            Some(bit) => bit,
            None => {
                warn!("secure random source unavailable, falling back to clock parity");
                self.clock.now_ms().rem_euclid(2) == 1
            }
        };
        if bit {
            Variant::Streamlined
        } else {
            Variant::Control
        }
    }
}
