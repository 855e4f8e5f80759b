//! JSON encoding of computed sample arrays.
//!
//! JSON has no literal for NaN or infinity, so non-finite samples are written
//! as the strings `"NaN"`, `"inf"` and `"-inf"`. Reading also accepts `null`
//! as NaN, which is how plain serde_json writes non-finite floats.

use std::fmt;

use serde::de::{self, Deserialize, Deserializer, Visitor};
use serde::ser::{Serialize, SerializeSeq, Serializer};

const NAN: &str = "NaN";
const INFINITY: &str = "inf";
const NEG_INFINITY: &str = "-inf";

pub fn serialize<S>(samples: &[f64], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut seq = serializer.serialize_seq(Some(samples.len()))?;
    for &value in samples {
        if value.is_finite() {
            seq.serialize_element(&value)?;
        } else if value.is_nan() {
            seq.serialize_element(NAN)?;
        } else if value > 0.0 {
            seq.serialize_element(INFINITY)?;
        } else {
            seq.serialize_element(NEG_INFINITY)?;
        }
    }
    seq.end()
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let samples = Vec::<Sample>::deserialize(deserializer)?;
    Ok(samples.into_iter().map(|s| s.0).collect())
}

/// The same encoding for an optional array; a missing or `null` array is `None`.
pub mod option {
    use super::*;

    struct Samples<'a>(&'a [f64]);

    impl Serialize for Samples<'_> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            super::serialize(self.0, serializer)
        }
    }

    struct SampleVec(Vec<f64>);

    impl<'de> Deserialize<'de> for SampleVec {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            super::deserialize(deserializer).map(SampleVec)
        }
    }

    pub fn serialize<S>(samples: &Option<Vec<f64>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match samples {
            Some(values) => serializer.serialize_some(&Samples(values)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<f64>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let samples = Option::<SampleVec>::deserialize(deserializer)?;
        Ok(samples.map(|s| s.0))
    }
}

struct Sample(f64);

impl<'de> Deserialize<'de> for Sample {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(SampleVisitor)
    }
}

struct SampleVisitor;

impl<'de> Visitor<'de> for SampleVisitor {
    type Value = Sample;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a number, null, \"NaN\", \"inf\" or \"-inf\"")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(Sample(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Sample(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Sample(v as f64))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Sample(f64::NAN))
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Sample(f64::NAN))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        match v {
            NAN => Ok(Sample(f64::NAN)),
            INFINITY => Ok(Sample(f64::INFINITY)),
            NEG_INFINITY => Ok(Sample(f64::NEG_INFINITY)),
            other => Err(E::invalid_value(de::Unexpected::Str(other), &self)),
        }
    }
}
