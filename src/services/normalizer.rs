use serde::{
    de::{IgnoredAny, MapAccess, SeqAccess},
    Deserialize,
};

use crate::{markup, models::AnswerPair};

/// The part of a quiz platform question record that answer extraction reads.
/// Everything else in the record is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct QuestionRecord {
    #[serde(default)]
    pub structure: QuestionStructure,
}

#[derive(Debug, Default, Deserialize)]
pub struct QuestionStructure {
    #[serde(default)]
    pub query: RichText,
    #[serde(default)]
    pub options: Vec<RichText>,
    #[serde(default, deserialize_with = "deserialize_answer_index")]
    pub answer: Option<usize>,
}

/// A text field that may embed markup.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RichText {
    #[serde(default)]
    pub text: String,
}

impl From<&str> for RichText {
    fn from(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

/// Why a question record was left out of the extracted answers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Skip {
    #[error("answer index {index} is out of range for {options} options")]
    AnswerOutOfRange { index: usize, options: usize },
    #[error("question has no single answer index")]
    NoAnswerIndex,
    #[error("question record is malformed: {0}")]
    MalformedRecord(String),
}

/// Accepts a non-negative integer, or a string holding one. Multi-select arrays,
/// `null` and anything else become `None`.
fn deserialize_answer_index<'de, D: serde::Deserializer<'de>>(
    d: D,
) -> Result<Option<usize>, D::Error> {
    struct Vis;
    impl<'de> serde::de::Visitor<'de> for Vis {
        type Value = Option<usize>;
        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            f.write_str("answer index")
        }
        fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(usize::try_from(v).ok())
        }
        fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(usize::try_from(v).ok())
        }
        fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<Self::Value, E> {
            if v >= 0.0 && v.fract() == 0.0 && v <= usize::MAX as f64 {
                Ok(Some(v as usize))
            } else {
                Ok(None)
            }
        }
        fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(v.trim().parse().ok())
        }
        fn visit_bool<E: serde::de::Error>(self, _: bool) -> Result<Self::Value, E> {
            Ok(None)
        }
        fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }
        fn visit_none<E: serde::de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }
        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            while seq.next_element::<IgnoredAny>()?.is_some() {}
            Ok(None)
        }
        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
            Ok(None)
        }
    }
    d.deserialize_any(Vis)
}

/// Pick the correct option of `record` and strip the markup from it and from the prompt.
pub fn normalize(record: &QuestionRecord) -> Result<AnswerPair, Skip> {
    let structure = &record.structure;
    let index = structure.answer.ok_or(Skip::NoAnswerIndex)?;
    let option = structure
        .options
        .get(index)
        .ok_or(Skip::AnswerOutOfRange {
            index,
            options: structure.options.len(),
        })?;

    Ok(AnswerPair {
        question: markup::strip(&structure.query.text),
        answer: markup::strip(&option.text),
    })
}

/// Decode one raw question record on its own and normalize it.
pub fn normalize_raw(raw: &serde_json::Value) -> Result<AnswerPair, Skip> {
    let record =
        QuestionRecord::deserialize(raw).map_err(|e| Skip::MalformedRecord(e.to_string()))?;
    normalize(&record)
}
