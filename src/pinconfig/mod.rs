//! Named pin-function selectors.
//!
//! Each constant packs a pin number and the function it should take, ready
//! for [`Pinsel::set_pin_config`](crate::pinsel::Pinsel::set_pin_config):
//!
//! ```ignore
//! pinsel.set_pin_config(pinconfig::P0_0_TXD0);
//! pinsel.set_pin_config(pinconfig::P0_1_RXD0);
//! ```
//!
//! The table of the selected chip is re-exported at this level; the others
//! stay reachable through their modules.

pub use crate::pinsel::{PinConfig, PinFunction};

pub mod lpc2103;
pub mod lpc2106;
pub mod lpc2148;

#[cfg(feature = "lpc2103")]
pub use self::lpc2103::*;
#[cfg(feature = "lpc2106")]
pub use self::lpc2106::*;
#[cfg(feature = "lpc2148")]
pub use self::lpc2148::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selectors_pack_function_above_pin() {
        assert_eq!(lpc2103::P0_0_TXD0.bits(), 1 << 5);
        assert_eq!(lpc2106::P0_9_PWM6.bits(), (2 << 5) | 9);
        assert_eq!(lpc2148::P0_30_CAP0_0.bits(), (3 << 5) | 30);
    }

    #[test]
    fn corrected_entries() {
        assert_eq!(lpc2103::P0_31_TDO.function(), PinFunction::Alt1);
        assert_eq!(lpc2148::P0_27_AD0_0.pin(), 27);
        assert_eq!(lpc2148::P0_14_EINT1.function(), PinFunction::Alt2);
        assert_eq!(lpc2148::P0_14_SDA1.function(), PinFunction::Alt3);
        assert_eq!(lpc2148::P0_31_GPIO.function(), PinFunction::Gpio);
    }
}
