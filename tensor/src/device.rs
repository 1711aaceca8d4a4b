//! Parsing device strings.

use fori_dtype::DeviceSpec;
use snafu::OptionExt;

use crate::error::{InvalidDeviceSnafu, Result};

pub trait DeviceSpecExt: Sized {
    /// Parse `CPU`, `CUDA`, `CUDA:1`, `TPU:0` (case-insensitive). A missing id means device 0.
    fn parse(device: &str) -> Result<Self>;
}

impl DeviceSpecExt for DeviceSpec {
    fn parse(device: &str) -> Result<Self> {
        let trimmed = device.trim();
        let (base, id) = match trimmed.split_once(':') {
            Some((base, id)) => (base, Some(id)),
            None => (trimmed, None),
        };
        let device_id = match id {
            Some(id) => id.trim().parse::<usize>().ok().context(InvalidDeviceSnafu { device })?,
            None => 0,
        };

        match base.trim().to_ascii_uppercase().as_str() {
            "CPU" if id.is_none() => Ok(DeviceSpec::Cpu),
            "CUDA" | "GPU" => Ok(DeviceSpec::Cuda { device_id }),
            "TPU" => Ok(DeviceSpec::Tpu { device_id }),
            _ => InvalidDeviceSnafu { device }.fail(),
        }
    }
}
