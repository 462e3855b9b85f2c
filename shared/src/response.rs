use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::WorkflowError;
use crate::media::MediaType;
use crate::model::{AnalysisResult, ClassScore, MediaId, SentenceVerdict, SuspiciousSpan};

pub(crate) const UNEXPECTED_RESPONSE: &str = "Unexpected response from the detection service.";

// Every detector returns its own flavour of verdict. Fields are all
// optional here and reconciled in `normalize`.
#[derive(Debug, Default, Deserialize)]
struct RawVerdict {
    label: Option<String>,
    score: Option<f64>,
    heatmap: Option<String>,
    heatmap_url: Option<String>,
    piechart_url: Option<String>,
    media_id: Option<serde_json::Value>,
    #[serde(rename = "mediaId")]
    media_id_camel: Option<serde_json::Value>,
    prediction: Option<BTreeMap<String, f64>>,
    #[serde(default)]
    sentence_predictions: Vec<SentenceVerdict>,
    #[serde(default)]
    suspicious_sentences: Vec<SentenceVerdict>,
    #[serde(default)]
    frame_predictions: Vec<TimedScores>,
    #[serde(default)]
    time_predictions: Vec<TimedScores>,
    #[serde(default)]
    suspicious_spans_seconds: Vec<SuspiciousSpan>,
}

// One sampled video frame or one second of audio.
#[derive(Debug, Default, Deserialize)]
struct TimedScores {
    #[serde(default)]
    probabilities: BTreeMap<String, f64>,
}

fn unexpected() -> WorkflowError {
    WorkflowError::Server {
        status: None,
        message: UNEXPECTED_RESPONSE.to_string(),
    }
}

fn clamp_score(score: f64) -> Option<f32> {
    score.is_finite().then(|| score.clamp(0.0, 1.0) as f32)
}

fn ranked(scores: &BTreeMap<String, f64>) -> Vec<ClassScore> {
    let mut ranked: Vec<ClassScore> = scores
        .iter()
        .filter_map(|(label, &score)| {
            clamp_score(score).map(|score| ClassScore {
                label: label.clone(),
                score,
            })
        })
        .collect();
    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    ranked
}

fn average<'a>(rows: impl Iterator<Item = Vec<(&'a str, f64)>>) -> BTreeMap<String, f64> {
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    let mut count = 0usize;
    for row in rows {
        count += 1;
        for (label, score) in row {
            *totals.entry(label.to_string()).or_default() += score;
        }
    }
    let count = count.max(1) as f64;
    totals.values_mut().for_each(|total| *total /= count);
    totals
}

fn timed_average(rows: &[TimedScores]) -> BTreeMap<String, f64> {
    average(rows.iter().map(|row| {
        row.probabilities
            .iter()
            .map(|(label, &score)| (label.as_str(), score))
            .collect()
    }))
}

fn sentence_average(sentences: &[SentenceVerdict]) -> BTreeMap<String, f64> {
    average(sentences.iter().map(|sentence| {
        sentence
            .scores
            .iter()
            .map(|(label, &score)| (label.as_str(), f64::from(score)))
            .collect()
    }))
}

fn media_id_of(value: Option<serde_json::Value>) -> Option<MediaId> {
    match value? {
        serde_json::Value::String(id) if !id.trim().is_empty() => Some(MediaId::from(id)),
        serde_json::Value::Number(n) => Some(MediaId::from(n.to_string())),
        _ => None,
    }
}

/// Reconciles a 2xx response body into an [`AnalysisResult`].
///
/// Accepts the flat `{label, score}` shape, the per-class `prediction`
/// map, per-frame video and per-second audio breakdowns, and
/// per-sentence text breakdowns. An id is generated when the
/// backend did not send one.
pub fn normalize(media: MediaType, body: &serde_json::Value) -> Result<AnalysisResult, WorkflowError> {
    let raw: RawVerdict = serde_json::from_value(body.clone()).map_err(|err| {
        log::warn!("{} response did not match any verdict shape: {}", media, err);
        unexpected()
    })?;

    let mut breakdown = raw.prediction.as_ref().map(ranked).unwrap_or_default();
    if breakdown.is_empty() && !raw.frame_predictions.is_empty() {
        breakdown = ranked(&timed_average(&raw.frame_predictions));
    }
    if breakdown.is_empty() && !raw.time_predictions.is_empty() {
        breakdown = ranked(&timed_average(&raw.time_predictions));
    }
    if breakdown.is_empty() && !raw.sentence_predictions.is_empty() {
        breakdown = ranked(&sentence_average(&raw.sentence_predictions));
    }

    let (label, score) = match (raw.label, raw.score) {
        (Some(label), Some(score)) => (label, clamp_score(score).ok_or_else(unexpected)?),
        _ => {
            let top = breakdown.first().ok_or_else(unexpected)?;
            (top.label.clone(), top.score)
        }
    };
    if label.trim().is_empty() {
        return Err(unexpected());
    }

    let media_id = media_id_of(raw.media_id)
        .or_else(|| media_id_of(raw.media_id_camel))
        .unwrap_or_else(|| MediaId::generate(media));

    Ok(AnalysisResult {
        label,
        score,
        heatmap_url: raw.heatmap.or(raw.heatmap_url).or(raw.piechart_url),
        media_id,
        breakdown,
        suspicious: raw.suspicious_sentences,
        suspicious_spans: raw.suspicious_spans_seconds,
    })
}
