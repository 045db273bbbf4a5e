//! The fixed set of built-in constants (`double.INFINITY` and friends).
//!
//! These are looked up only after scope-based value lookup misses (§4.1
//! step 4); they are never registered in any scope or in `ValuesByKey`.

use crate::literal::LiteralValue;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuiltInConstant {
    DoubleInfinity,
    DoubleNegativeInfinity,
    DoubleNan,
    FloatInfinity,
    FloatNegativeInfinity,
    FloatNan,
}

impl BuiltInConstant {
    #[must_use]
    pub fn lookup(identifier: &str) -> Option<Self> {
        Some(match identifier {
            "double.INFINITY" => Self::DoubleInfinity,
            "double.NEGATIVE_INFINITY" => Self::DoubleNegativeInfinity,
            "double.NAN" => Self::DoubleNan,
            "float.INFINITY" => Self::FloatInfinity,
            "float.NEGATIVE_INFINITY" => Self::FloatNegativeInfinity,
            "float.NAN" => Self::FloatNan,
            _ => return None,
        })
    }

    #[must_use]
    pub fn concrete_value(self) -> LiteralValue {
        match self {
            Self::DoubleInfinity => LiteralValue::Double(f64::INFINITY),
            Self::DoubleNegativeInfinity => LiteralValue::Double(f64::NEG_INFINITY),
            Self::DoubleNan => LiteralValue::Double(f64::NAN),
            Self::FloatInfinity => LiteralValue::Float(f32::INFINITY),
            Self::FloatNegativeInfinity => LiteralValue::Float(f32::NEG_INFINITY),
            Self::FloatNan => LiteralValue::Float(f32::NAN),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looks_up_all_six_built_ins() {
        for name in [
            "double.INFINITY",
            "double.NEGATIVE_INFINITY",
            "double.NAN",
            "float.INFINITY",
            "float.NEGATIVE_INFINITY",
            "float.NAN",
        ] {
            assert!(BuiltInConstant::lookup(name).is_some(), "{name}");
        }
        assert_eq!(BuiltInConstant::lookup("double.PI"), None);
    }
}
