/// Default sample rate of the entity [Hz]
pub const DEFAULT_RS: f64 = 100.0e6;
/// Default supply voltage for analog simulation [V]
pub const DEFAULT_VDD: f64 = 1.0;
/// Default number of stimulus samples
pub const DEFAULT_LENGTH: usize = 256;
/// Default number of threads handed to SPICE engines
pub const DEFAULT_NPROC: usize = 2;
