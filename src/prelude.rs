//! Prelude

pub use crate::exti::ExtiRegisters as _stm32f3xx_exti_exti_ExtiRegisters;
#[cfg(feature = "device-selected")]
pub use crate::exti::ExtiExt as _stm32f3xx_exti_exti_ExtiExt;
pub use crate::gpio::GpioRegisters as _stm32f3xx_exti_gpio_GpioRegisters;
pub use crate::hal::digital::v2::{
    InputPin as _embedded_hal_digital_InputPin, OutputPin as _embedded_hal_digital_OutputPin,
    StatefulOutputPin as _embedded_hal_digital_StatefulOutputPin,
    ToggleableOutputPin as _embedded_hal_digital_ToggleableOutputPin,
};
#[cfg(feature = "device-selected")]
pub use crate::rcc::RccExt as _stm32f3xx_exti_rcc_RccExt;
#[cfg(feature = "device-selected")]
pub use crate::syscfg::SysCfgExt as _stm32f3xx_exti_syscfg_SysCfgExt;
