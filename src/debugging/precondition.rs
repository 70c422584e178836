// SPDX-License-Identifier: MIT

//! Buffer readiness checks before a kernel launch

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::config::ExecutionMode;
use crate::runtime::error::{DebugError, PreconditionError};

/// Where a buffer's memory lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    Cpu,
    Gpu(u32),
}

impl Device {
    pub fn is_gpu(&self) -> bool {
        matches!(self, Device::Gpu(_))
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Cpu => write!(f, "cpu"),
            Device::Gpu(index) => write!(f, "gpu:{}", index),
        }
    }
}

impl FromStr for Device {
    type Err = DebugError;

    /// `cpu`, `gpu` (index 0) or `gpu:N`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cpu" => Ok(Device::Cpu),
            "gpu" | "cuda" => Ok(Device::Gpu(0)),
            other => other
                .strip_prefix("gpu:")
                .or_else(|| other.strip_prefix("cuda:"))
                .and_then(|index| index.parse().ok())
                .map(Device::Gpu)
                .ok_or_else(|| DebugError::config(format!("unknown device '{}'", s))),
        }
    }
}

/// Layout and residency of a buffer handed to a kernel
pub trait Buffer {
    /// Name used in error messages
    fn label(&self) -> &str;

    /// Extent of each dimension
    fn shape(&self) -> &[usize];

    /// Element stride of each dimension
    fn strides(&self) -> &[usize];

    fn device(&self) -> Device;

    /// Row-major contiguity: size-1 dimensions are ignored and a buffer with
    /// any zero extent holds no elements, so it is trivially contiguous.
    fn is_contiguous(&self) -> bool {
        let (shape, strides) = (self.shape(), self.strides());
        if shape.len() != strides.len() {
            return false;
        }
        if shape.contains(&0) {
            return true;
        }

        let mut expected = 1usize;
        for (extent, stride) in shape.iter().zip(strides).rev() {
            if *extent != 1 && *stride != expected {
                return false;
            }
            expected = expected.saturating_mul(*extent);
        }
        true
    }
}

/// Plain description of a buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferView {
    label: String,
    shape: Vec<usize>,
    strides: Vec<usize>,
    device: Device,
}

impl BufferView {
    /// A densely packed row-major buffer
    pub fn contiguous(label: impl Into<String>, shape: Vec<usize>, device: Device) -> Self {
        let mut strides = vec![1; shape.len()];
        for i in (0..shape.len().saturating_sub(1)).rev() {
            strides[i] = strides[i + 1] * shape[i + 1].max(1);
        }
        Self {
            label: label.into(),
            shape,
            strides,
            device,
        }
    }

    /// A buffer with explicit strides, e.g. a transposed or sliced view
    pub fn strided(
        label: impl Into<String>,
        shape: Vec<usize>,
        strides: Vec<usize>,
        device: Device,
    ) -> Self {
        Self {
            label: label.into(),
            shape,
            strides,
            device,
        }
    }
}

impl Buffer for BufferView {
    fn label(&self) -> &str {
        &self.label
    }

    fn shape(&self) -> &[usize] {
        &self.shape
    }

    fn strides(&self) -> &[usize] {
        &self.strides
    }

    fn device(&self) -> Device {
        self.device
    }
}

/// Assert every buffer is contiguous and, unless `mode` is interpreted,
/// resident on a GPU. Stops at the first violation.
pub fn check_ready(buffers: &[&dyn Buffer], mode: ExecutionMode) -> Result<(), PreconditionError> {
    for buffer in buffers {
        if !buffer.is_contiguous() {
            return Err(PreconditionError::NotContiguous {
                buffer: buffer.label().to_string(),
            });
        }
        if mode.enforces_residency() && !buffer.device().is_gpu() {
            return Err(PreconditionError::NotOnDevice {
                buffer: buffer.label().to_string(),
                device: buffer.device().to_string(),
            });
        }
    }
    log::debug!("{} buffer(s) ready ({:?} mode)", buffers.len(), mode);
    Ok(())
}
