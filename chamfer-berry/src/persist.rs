//! 掩膜的二进制持久化 (`bincode`).
//!
//! 解码后的掩膜会重新经过完整的校验, 因此不能借助篡改过的字节绕开构建时的约束.

use crate::error::MaskError;
use crate::mask::ChamferMask;

/// 掩膜解码错误.
#[derive(Debug)]
pub enum DecodeMaskError {
    /// 字节流不是合法的 `bincode` 编码.
    Bincode(bincode::Error),

    /// 解码成功, 但掩膜未通过校验.
    Invalid(MaskError),
}

impl std::fmt::Display for DecodeMaskError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bincode(e) => write!(f, "cannot decode mask: {e}"),
            Self::Invalid(e) => write!(f, "decoded mask is invalid: {e}"),
        }
    }
}

impl std::error::Error for DecodeMaskError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Bincode(e) => Some(e.as_ref()),
            Self::Invalid(e) => Some(e),
        }
    }
}

impl From<bincode::Error> for DecodeMaskError {
    fn from(e: bincode::Error) -> Self {
        Self::Bincode(e)
    }
}

impl From<MaskError> for DecodeMaskError {
    fn from(e: MaskError) -> Self {
        Self::Invalid(e)
    }
}

/// 持久化
impl ChamferMask {
    /// 编码为字节. 编码错误原样返回.
    pub fn to_bytes(&self) -> bincode::Result<Vec<u8>> {
        bincode::serialize(self)
    }

    /// 从 [`Self::to_bytes`] 的结果解码, 并重新校验.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeMaskError> {
        let raw: ChamferMask = bincode::deserialize(bytes)?;
        let half = raw
            .forward_offsets()
            .iter()
            .map(|w| (w.offset(), w.weight()));
        Ok(ChamferMask::from_forward_with(raw.dim(), raw.rounding(), half)?)
    }
}
