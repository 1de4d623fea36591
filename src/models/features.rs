//! Feature Schema & Validator
//!
//! `Features` is the only shape scoring models ever see. Untrusted data goes
//! through [`FeatureSchema::parse`] (raw JSON) or [`FeatureSchema::validate`]
//! (typed bundles from a provider) before it reaches a model.
//!
//! Two layers run in order:
//! 1. Type layer: each field must have the declared primitive type or be
//!    absent/null. Counts must be non-negative integers.
//! 2. Range layer: percentages in [0, 100], ratios in [0, 1], sentiment in
//!    [-1, 1], everything else non-negative and finite.
//!
//! Nothing is clamped or coerced. Missing data stays `None` so a model can
//! tell "unknown" apart from a measured zero.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::errors::{AppError, AppResult, FieldError, FieldErrorCode};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HolderDistribution {
    /// Share of supply held by the top 1% of holders (percent)
    pub top1_percent: Option<f64>,
    /// Share of supply held by the top 10% of holders (percent)
    pub top10_percent: Option<f64>,
    pub unique_holders: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPatterns {
    pub bot_like_activity: Option<f64>,
    pub human_like_activity: Option<f64>,
    pub suspicious_transfers: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossChainActivity {
    pub bridged: Option<bool>,
    pub active_chains: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeSpike {
    /// Volume over the last 24h relative to baseline
    pub ratio_24h: Option<f64>,
    pub ratio_7d: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialSignals {
    pub mentions_24h: Option<u64>,
    /// Mention growth factor versus the previous period
    pub mention_growth: Option<f64>,
    /// Mentions by accounts with large followings
    pub big_follower_mentions: Option<u64>,
    pub search_trend_spike: Option<f64>,
    pub network_effect_velocity: Option<f64>,
    pub meme_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhaleActivity {
    pub accumulation_ratio: Option<f64>,
    pub selling_ratio: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeveloperActivity {
    pub commits_30d: Option<u64>,
    pub contributors: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub hash: String,
    pub from: String,
    pub to: String,
    pub value: f64,
    /// Unix seconds
    pub timestamp: u64,
    pub gas_used: u64,
}

/// Validated feature bundle for one address
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Features {
    pub liquidity_ratio: Option<f64>,
    pub holder_distribution: HolderDistribution,
    pub contract_age_sec: Option<u64>,
    pub transaction_patterns: TransactionPatterns,
    pub cross_chain_activity: CrossChainActivity,
    pub volume_spike: VolumeSpike,
    /// Signed sentiment in [-1, 1]
    pub social_sentiment: Option<f64>,
    pub social_signals: SocialSignals,
    pub whale_activity: WhaleActivity,
    pub developer_activity: DeveloperActivity,
    pub market_cap_growth_7d: Option<f64>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl Features {
    /// Number of top-level feature keys
    pub fn key_count(&self) -> usize {
        serde_json::to_value(self)
            .ok()
            .and_then(|v| v.as_object().map(Map::len))
            .unwrap_or(0)
    }
}

/// Entry points of the schema
pub struct FeatureSchema;

impl FeatureSchema {
    /// Parse untrusted JSON text
    pub fn parse_str(raw: &str) -> AppResult<Features> {
        let value: Value = serde_json::from_str(raw)?;
        Self::parse(&value)
    }

    /// Parse an untrusted JSON value into a validated bundle
    pub fn parse(raw: &Value) -> AppResult<Features> {
        let mut reader = Reader::default();
        let features = reader.features(raw);
        let mut errors = reader.errors;
        if let Some(features) = &features {
            errors.extend(range_errors(features));
        }
        match features {
            Some(features) if errors.is_empty() => Ok(features),
            _ => Err(AppError::validation(errors)),
        }
    }

    /// Re-check a typed bundle (e.g. straight from a provider)
    pub fn validate(features: &Features) -> AppResult<()> {
        let errors = range_errors(features);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::validation(errors))
        }
    }
}

// ============================================
// TYPE LAYER
// ============================================

#[derive(Default)]
struct Reader {
    errors: Vec<FieldError>,
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl Reader {
    fn invalid_type(&mut self, path: String, expected: &str, got: &Value) {
        self.errors.push(FieldError::new(
            path,
            FieldErrorCode::InvalidType,
            format!("expected {}, received {}", expected, type_name(got)),
        ));
    }

    fn features(&mut self, raw: &Value) -> Option<Features> {
        let Some(obj) = raw.as_object() else {
            self.invalid_type("$".to_string(), "object", raw);
            return None;
        };

        let holders = self.group(obj, "holderDistribution");
        let patterns = self.group(obj, "transactionPatterns");
        let cross = self.group(obj, "crossChainActivity");
        let volume = self.group(obj, "volumeSpike");
        let social = self.group(obj, "socialSignals");
        let whale = self.group(obj, "whaleActivity");
        let dev = self.group(obj, "developerActivity");

        Some(Features {
            liquidity_ratio: self.number(Some(obj), "", "liquidityRatio"),
            holder_distribution: HolderDistribution {
                top1_percent: self.number(holders, "holderDistribution", "top1Percent"),
                top10_percent: self.number(holders, "holderDistribution", "top10Percent"),
                unique_holders: self.count(holders, "holderDistribution", "uniqueHolders"),
            },
            contract_age_sec: self.count(Some(obj), "", "contractAgeSec"),
            transaction_patterns: TransactionPatterns {
                bot_like_activity: self.number(patterns, "transactionPatterns", "botLikeActivity"),
                human_like_activity: self.number(patterns, "transactionPatterns", "humanLikeActivity"),
                suspicious_transfers: self.count(patterns, "transactionPatterns", "suspiciousTransfers"),
            },
            cross_chain_activity: CrossChainActivity {
                bridged: self.flag(cross, "crossChainActivity", "bridged"),
                active_chains: self.count(cross, "crossChainActivity", "activeChains"),
            },
            volume_spike: VolumeSpike {
                ratio_24h: self.number(volume, "volumeSpike", "ratio24h"),
                ratio_7d: self.number(volume, "volumeSpike", "ratio7d"),
            },
            social_sentiment: self.number(Some(obj), "", "socialSentiment"),
            social_signals: SocialSignals {
                mentions_24h: self.count(social, "socialSignals", "mentions24h"),
                mention_growth: self.number(social, "socialSignals", "mentionGrowth"),
                big_follower_mentions: self.count(social, "socialSignals", "bigFollowerMentions"),
                search_trend_spike: self.number(social, "socialSignals", "searchTrendSpike"),
                network_effect_velocity: self.number(social, "socialSignals", "networkEffectVelocity"),
                meme_score: self.number(social, "socialSignals", "memeScore"),
            },
            whale_activity: WhaleActivity {
                accumulation_ratio: self.number(whale, "whaleActivity", "accumulationRatio"),
                selling_ratio: self.number(whale, "whaleActivity", "sellingRatio"),
            },
            developer_activity: DeveloperActivity {
                commits_30d: self.count(dev, "developerActivity", "commits30d"),
                contributors: self.count(dev, "developerActivity", "contributors"),
            },
            market_cap_growth_7d: self.number(Some(obj), "", "marketCapGrowth7d"),
            transactions: self.transactions(obj),
        })
    }

    /// Nested object; absent or null groups read as all-null
    fn group<'a>(&mut self, obj: &'a Map<String, Value>, key: &str) -> Option<&'a Map<String, Value>> {
        match obj.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::Object(inner)) => Some(inner),
            Some(other) => {
                self.invalid_type(key.to_string(), "object", other);
                None
            }
        }
    }

    fn number(&mut self, obj: Option<&Map<String, Value>>, prefix: &str, key: &str) -> Option<f64> {
        match obj?.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::Number(n)) => n.as_f64(),
            Some(other) => {
                self.invalid_type(join(prefix, key), "number", other);
                None
            }
        }
    }

    fn count(&mut self, obj: Option<&Map<String, Value>>, prefix: &str, key: &str) -> Option<u64> {
        match obj?.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::Number(n)) => self.integer(join(prefix, key), n),
            Some(other) => {
                self.invalid_type(join(prefix, key), "integer", other);
                None
            }
        }
    }

    fn integer(&mut self, path: String, n: &serde_json::Number) -> Option<u64> {
        if let Some(v) = n.as_u64() {
            return Some(v);
        }
        let as_float = n.as_f64().unwrap_or(f64::NAN);
        if as_float < 0.0 {
            self.errors.push(FieldError::new(
                path,
                FieldErrorCode::TooSmall,
                format!("must be >= 0, received {}", n),
            ));
        } else if as_float.fract() == 0.0 && as_float <= u64::MAX as f64 {
            return Some(as_float as u64);
        } else {
            self.errors.push(FieldError::new(
                path,
                FieldErrorCode::NotInteger,
                format!("expected integer, received {}", n),
            ));
        }
        None
    }

    fn flag(&mut self, obj: Option<&Map<String, Value>>, prefix: &str, key: &str) -> Option<bool> {
        match obj?.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::Bool(b)) => Some(*b),
            Some(other) => {
                self.invalid_type(join(prefix, key), "boolean", other);
                None
            }
        }
    }

    fn transactions(&mut self, obj: &Map<String, Value>) -> Vec<Transaction> {
        let items = match obj.get("transactions") {
            None | Some(Value::Null) => return Vec::new(),
            Some(Value::Array(items)) => items,
            Some(other) => {
                self.invalid_type("transactions".to_string(), "array", other);
                return Vec::new();
            }
        };

        items
            .iter()
            .enumerate()
            .filter_map(|(i, item)| self.transaction(i, item))
            .collect()
    }

    fn transaction(&mut self, index: usize, item: &Value) -> Option<Transaction> {
        let prefix = format!("transactions.{}", index);
        let Some(tx) = item.as_object() else {
            self.invalid_type(prefix, "object", item);
            return None;
        };

        let before = self.errors.len();
        let hash = self.required_string(tx, &prefix, "hash");
        let from = self.required_string(tx, &prefix, "from");
        let to = self.required_string(tx, &prefix, "to");
        let value = self.required(tx, &prefix, "value").and_then(|_| self.number(Some(tx), &prefix, "value"));
        let timestamp = self.required(tx, &prefix, "timestamp").and_then(|_| self.count(Some(tx), &prefix, "timestamp"));
        let gas_used = self.required(tx, &prefix, "gasUsed").and_then(|_| self.count(Some(tx), &prefix, "gasUsed"));

        if self.errors.len() != before {
            return None;
        }
        Some(Transaction {
            hash: hash?,
            from: from?,
            to: to?,
            value: value?,
            timestamp: timestamp?,
            gas_used: gas_used?,
        })
    }

    fn required<'a>(&mut self, obj: &'a Map<String, Value>, prefix: &str, key: &str) -> Option<&'a Value> {
        match obj.get(key) {
            None | Some(Value::Null) => {
                self.errors.push(FieldError::new(
                    join(prefix, key),
                    FieldErrorCode::Required,
                    "field is required",
                ));
                None
            }
            Some(v) => Some(v),
        }
    }

    fn required_string(&mut self, obj: &Map<String, Value>, prefix: &str, key: &str) -> Option<String> {
        match self.required(obj, prefix, key)? {
            Value::String(s) => Some(s.clone()),
            other => {
                self.invalid_type(join(prefix, key), "string", other);
                None
            }
        }
    }
}

// ============================================
// RANGE LAYER
// ============================================

fn check_range(errors: &mut Vec<FieldError>, path: &str, value: Option<f64>, min: f64, max: f64) {
    let Some(v) = value else { return };
    if !v.is_finite() {
        errors.push(FieldError::new(path, FieldErrorCode::NotFinite, "must be a finite number"));
    } else if v < min {
        errors.push(FieldError::new(
            path,
            FieldErrorCode::TooSmall,
            format!("must be >= {}, received {}", min, v),
        ));
    } else if v > max {
        errors.push(FieldError::new(
            path,
            FieldErrorCode::TooBig,
            format!("must be <= {}, received {}", max, v),
        ));
    }
}

fn range_errors(f: &Features) -> Vec<FieldError> {
    const INF: f64 = f64::INFINITY;
    let mut errors = Vec::new();
    let e = &mut errors;

    check_range(e, "liquidityRatio", f.liquidity_ratio, 0.0, 1.0);
    check_range(e, "holderDistribution.top1Percent", f.holder_distribution.top1_percent, 0.0, 100.0);
    check_range(e, "holderDistribution.top10Percent", f.holder_distribution.top10_percent, 0.0, 100.0);
    check_range(e, "transactionPatterns.botLikeActivity", f.transaction_patterns.bot_like_activity, 0.0, 1.0);
    check_range(e, "transactionPatterns.humanLikeActivity", f.transaction_patterns.human_like_activity, 0.0, 1.0);
    check_range(e, "volumeSpike.ratio24h", f.volume_spike.ratio_24h, 0.0, INF);
    check_range(e, "volumeSpike.ratio7d", f.volume_spike.ratio_7d, 0.0, INF);
    check_range(e, "socialSentiment", f.social_sentiment, -1.0, 1.0);
    check_range(e, "socialSignals.mentionGrowth", f.social_signals.mention_growth, 0.0, INF);
    check_range(e, "socialSignals.searchTrendSpike", f.social_signals.search_trend_spike, 0.0, INF);
    check_range(e, "socialSignals.networkEffectVelocity", f.social_signals.network_effect_velocity, 0.0, 1.0);
    check_range(e, "socialSignals.memeScore", f.social_signals.meme_score, 0.0, 1.0);
    check_range(e, "whaleActivity.accumulationRatio", f.whale_activity.accumulation_ratio, 0.0, 1.0);
    check_range(e, "whaleActivity.sellingRatio", f.whale_activity.selling_ratio, 0.0, 1.0);
    check_range(e, "marketCapGrowth7d", f.market_cap_growth_7d, 0.0, INF);

    for (i, tx) in f.transactions.iter().enumerate() {
        check_range(e, &format!("transactions.{}.value", i), Some(tx.value), 0.0, INF);
        if tx.hash.is_empty() {
            e.push(FieldError::new(
                format!("transactions.{}.hash", i),
                FieldErrorCode::TooSmall,
                "must not be empty",
            ));
        }
    }

    errors
}
