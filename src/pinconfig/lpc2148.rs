//! LPC2141/2/4/6/8 pin functions, port 0.
//!
//! P0.31 is output only. P0.24 does not exist.

use super::{PinConfig, PinFunction};

pub const P0_0_GPIO: PinConfig = PinConfig::new(0, PinFunction::Gpio);
pub const P0_0_TXD0: PinConfig = PinConfig::new(0, PinFunction::Alt1);
pub const P0_0_PWM1: PinConfig = PinConfig::new(0, PinFunction::Alt2);

pub const P0_1_GPIO: PinConfig = PinConfig::new(1, PinFunction::Gpio);
pub const P0_1_RXD0: PinConfig = PinConfig::new(1, PinFunction::Alt1);
pub const P0_1_PWM3: PinConfig = PinConfig::new(1, PinFunction::Alt2);
pub const P0_1_EINT0: PinConfig = PinConfig::new(1, PinFunction::Alt3);

pub const P0_2_GPIO: PinConfig = PinConfig::new(2, PinFunction::Gpio);
pub const P0_2_SCL0: PinConfig = PinConfig::new(2, PinFunction::Alt1);
pub const P0_2_CAP0_0: PinConfig = PinConfig::new(2, PinFunction::Alt2);

pub const P0_3_GPIO: PinConfig = PinConfig::new(3, PinFunction::Gpio);
pub const P0_3_SDA0: PinConfig = PinConfig::new(3, PinFunction::Alt1);
pub const P0_3_MAT0_0: PinConfig = PinConfig::new(3, PinFunction::Alt2);
pub const P0_3_EINT1: PinConfig = PinConfig::new(3, PinFunction::Alt3);

pub const P0_4_GPIO: PinConfig = PinConfig::new(4, PinFunction::Gpio);
pub const P0_4_SCK0: PinConfig = PinConfig::new(4, PinFunction::Alt1);
pub const P0_4_CAP0_1: PinConfig = PinConfig::new(4, PinFunction::Alt2);
pub const P0_4_AD0_6: PinConfig = PinConfig::new(4, PinFunction::Alt3);

pub const P0_5_GPIO: PinConfig = PinConfig::new(5, PinFunction::Gpio);
pub const P0_5_MISO0: PinConfig = PinConfig::new(5, PinFunction::Alt1);
pub const P0_5_MAT0_1: PinConfig = PinConfig::new(5, PinFunction::Alt2);
pub const P0_5_AD0_7: PinConfig = PinConfig::new(5, PinFunction::Alt3);

pub const P0_6_GPIO: PinConfig = PinConfig::new(6, PinFunction::Gpio);
pub const P0_6_MOSI0: PinConfig = PinConfig::new(6, PinFunction::Alt1);
pub const P0_6_CAP0_2: PinConfig = PinConfig::new(6, PinFunction::Alt2);
pub const P0_6_AD1_0: PinConfig = PinConfig::new(6, PinFunction::Alt3);

pub const P0_7_GPIO: PinConfig = PinConfig::new(7, PinFunction::Gpio);
pub const P0_7_SSEL0: PinConfig = PinConfig::new(7, PinFunction::Alt1);
pub const P0_7_PWM2: PinConfig = PinConfig::new(7, PinFunction::Alt2);
pub const P0_7_EINT2: PinConfig = PinConfig::new(7, PinFunction::Alt3);

pub const P0_8_GPIO: PinConfig = PinConfig::new(8, PinFunction::Gpio);
pub const P0_8_TXD1: PinConfig = PinConfig::new(8, PinFunction::Alt1);
pub const P0_8_PWM4: PinConfig = PinConfig::new(8, PinFunction::Alt2);
pub const P0_8_AD1_1: PinConfig = PinConfig::new(8, PinFunction::Alt3);

pub const P0_9_GPIO: PinConfig = PinConfig::new(9, PinFunction::Gpio);
pub const P0_9_RXD1: PinConfig = PinConfig::new(9, PinFunction::Alt1);
pub const P0_9_PWM6: PinConfig = PinConfig::new(9, PinFunction::Alt2);
pub const P0_9_EINT3: PinConfig = PinConfig::new(9, PinFunction::Alt3);

pub const P0_10_GPIO: PinConfig = PinConfig::new(10, PinFunction::Gpio);
pub const P0_10_RTS1: PinConfig = PinConfig::new(10, PinFunction::Alt1);
pub const P0_10_CAP1_0: PinConfig = PinConfig::new(10, PinFunction::Alt2);
pub const P0_10_AD1_2: PinConfig = PinConfig::new(10, PinFunction::Alt3);

pub const P0_11_GPIO: PinConfig = PinConfig::new(11, PinFunction::Gpio);
pub const P0_11_CTS1: PinConfig = PinConfig::new(11, PinFunction::Alt1);
pub const P0_11_CAP1_1: PinConfig = PinConfig::new(11, PinFunction::Alt2);
pub const P0_11_SCL1: PinConfig = PinConfig::new(11, PinFunction::Alt3);

pub const P0_12_GPIO: PinConfig = PinConfig::new(12, PinFunction::Gpio);
pub const P0_12_DSR1: PinConfig = PinConfig::new(12, PinFunction::Alt1);
pub const P0_12_MAT1_0: PinConfig = PinConfig::new(12, PinFunction::Alt2);
pub const P0_12_AD1_3: PinConfig = PinConfig::new(12, PinFunction::Alt3);

pub const P0_13_GPIO: PinConfig = PinConfig::new(13, PinFunction::Gpio);
pub const P0_13_DTR1: PinConfig = PinConfig::new(13, PinFunction::Alt1);
pub const P0_13_MAT1_1: PinConfig = PinConfig::new(13, PinFunction::Alt2);
pub const P0_13_AD1_4: PinConfig = PinConfig::new(13, PinFunction::Alt3);

pub const P0_14_GPIO: PinConfig = PinConfig::new(14, PinFunction::Gpio);
pub const P0_14_DCD1: PinConfig = PinConfig::new(14, PinFunction::Alt1);
pub const P0_14_EINT1: PinConfig = PinConfig::new(14, PinFunction::Alt2);
pub const P0_14_SDA1: PinConfig = PinConfig::new(14, PinFunction::Alt3);

pub const P0_15_GPIO: PinConfig = PinConfig::new(15, PinFunction::Gpio);
pub const P0_15_RI1: PinConfig = PinConfig::new(15, PinFunction::Alt1);
pub const P0_15_EINT2: PinConfig = PinConfig::new(15, PinFunction::Alt2);
pub const P0_15_AD1_5: PinConfig = PinConfig::new(15, PinFunction::Alt3);

pub const P0_16_GPIO: PinConfig = PinConfig::new(16, PinFunction::Gpio);
pub const P0_16_EINT0: PinConfig = PinConfig::new(16, PinFunction::Alt1);
pub const P0_16_MAT0_2: PinConfig = PinConfig::new(16, PinFunction::Alt2);
pub const P0_16_CAP0_2: PinConfig = PinConfig::new(16, PinFunction::Alt3);

pub const P0_17_GPIO: PinConfig = PinConfig::new(17, PinFunction::Gpio);
pub const P0_17_CAP1_2: PinConfig = PinConfig::new(17, PinFunction::Alt1);
pub const P0_17_SCK1: PinConfig = PinConfig::new(17, PinFunction::Alt2);
pub const P0_17_MAT1_2: PinConfig = PinConfig::new(17, PinFunction::Alt3);

pub const P0_18_GPIO: PinConfig = PinConfig::new(18, PinFunction::Gpio);
pub const P0_18_CAP1_3: PinConfig = PinConfig::new(18, PinFunction::Alt1);
pub const P0_18_MISO1: PinConfig = PinConfig::new(18, PinFunction::Alt2);
pub const P0_18_MAT1_3: PinConfig = PinConfig::new(18, PinFunction::Alt3);

pub const P0_19_GPIO: PinConfig = PinConfig::new(19, PinFunction::Gpio);
pub const P0_19_MAT1_2: PinConfig = PinConfig::new(19, PinFunction::Alt1);
pub const P0_19_MOSI1: PinConfig = PinConfig::new(19, PinFunction::Alt2);
pub const P0_19_CAP1_2: PinConfig = PinConfig::new(19, PinFunction::Alt3);

pub const P0_20_GPIO: PinConfig = PinConfig::new(20, PinFunction::Gpio);
pub const P0_20_MAT1_3: PinConfig = PinConfig::new(20, PinFunction::Alt1);
pub const P0_20_SSEL1: PinConfig = PinConfig::new(20, PinFunction::Alt2);
pub const P0_20_EINT3: PinConfig = PinConfig::new(20, PinFunction::Alt3);

pub const P0_21_GPIO: PinConfig = PinConfig::new(21, PinFunction::Gpio);
pub const P0_21_PWM5: PinConfig = PinConfig::new(21, PinFunction::Alt1);
pub const P0_21_AD1_6: PinConfig = PinConfig::new(21, PinFunction::Alt2);
pub const P0_21_CAP1_3: PinConfig = PinConfig::new(21, PinFunction::Alt3);

pub const P0_22_GPIO: PinConfig = PinConfig::new(22, PinFunction::Gpio);
pub const P0_22_AD1_7: PinConfig = PinConfig::new(22, PinFunction::Alt1);
pub const P0_22_CAP0_0: PinConfig = PinConfig::new(22, PinFunction::Alt2);
pub const P0_22_MAT0_0: PinConfig = PinConfig::new(22, PinFunction::Alt3);

pub const P0_23_GPIO: PinConfig = PinConfig::new(23, PinFunction::Gpio);
pub const P0_23_VBUS: PinConfig = PinConfig::new(23, PinFunction::Alt1);

pub const P0_25_GPIO: PinConfig = PinConfig::new(25, PinFunction::Gpio);
pub const P0_25_AD0_4: PinConfig = PinConfig::new(25, PinFunction::Alt1);
pub const P0_25_DAC: PinConfig = PinConfig::new(25, PinFunction::Alt2);

pub const P0_26_GPIO: PinConfig = PinConfig::new(26, PinFunction::Gpio);
pub const P0_26_AD0_5: PinConfig = PinConfig::new(26, PinFunction::Alt1);

pub const P0_27_GPIO: PinConfig = PinConfig::new(27, PinFunction::Gpio);
pub const P0_27_AD0_0: PinConfig = PinConfig::new(27, PinFunction::Alt1);
pub const P0_27_CAP0_1: PinConfig = PinConfig::new(27, PinFunction::Alt2);
pub const P0_27_MAT0_1: PinConfig = PinConfig::new(27, PinFunction::Alt3);

pub const P0_28_GPIO: PinConfig = PinConfig::new(28, PinFunction::Gpio);
pub const P0_28_AD0_1: PinConfig = PinConfig::new(28, PinFunction::Alt1);
pub const P0_28_CAP0_2: PinConfig = PinConfig::new(28, PinFunction::Alt2);
pub const P0_28_MAT0_2: PinConfig = PinConfig::new(28, PinFunction::Alt3);

pub const P0_29_GPIO: PinConfig = PinConfig::new(29, PinFunction::Gpio);
pub const P0_29_AD0_2: PinConfig = PinConfig::new(29, PinFunction::Alt1);
pub const P0_29_CAP0_3: PinConfig = PinConfig::new(29, PinFunction::Alt2);
pub const P0_29_MAT0_3: PinConfig = PinConfig::new(29, PinFunction::Alt3);

pub const P0_30_GPIO: PinConfig = PinConfig::new(30, PinFunction::Gpio);
pub const P0_30_AD0_3: PinConfig = PinConfig::new(30, PinFunction::Alt1);
pub const P0_30_EINT3: PinConfig = PinConfig::new(30, PinFunction::Alt2);
pub const P0_30_CAP0_0: PinConfig = PinConfig::new(30, PinFunction::Alt3);

pub const P0_31_GPIO: PinConfig = PinConfig::new(31, PinFunction::Gpio);
