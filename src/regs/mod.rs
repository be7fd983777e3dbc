//! Register maps
//!
//! - [`mac`]: 32-bit CSR space, reached directly through the bus
//! - [`bbp`]: baseband registers, reached through `BBP_CSR_CFG`
//! - [`rfcsr`]: RF control registers, reached through `RF_CSR_CFG`

pub mod mac;
pub mod bbp;
pub mod rfcsr;
