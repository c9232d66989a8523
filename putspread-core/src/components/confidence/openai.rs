//! OpenAI chat-completions narrative source.
//!
//! Sends the metric set, the tier and the algorithmic confidence to the
//! model and asks for a JSON object `{"commentary": ..., "confidence": ...}`.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::narrative::{Narrative, NarrativeError, NarrativeRequest, NarrativeSource};

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
const ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

const SYSTEM_PROMPT: &str = "You are an expert options trader specializing in bull put credit \
spreads. Provide concise, actionable trading advice. Always respond with valid JSON only.";

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f64,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    model: Option<String>,
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct Reply {
    commentary: String,
    confidence: Option<f64>,
}

pub struct OpenAiNarrative {
    client: reqwest::blocking::Client,
    api_key: String,
    model: String,
}

impl OpenAiNarrative {
    pub fn new(api_key: impl Into<String>) -> Result<Self, NarrativeError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        })
    }

    /// Reads the key from `OPENAI_API_KEY`.
    pub fn from_env() -> Result<Self, NarrativeError> {
        match std::env::var(API_KEY_VAR) {
            Ok(key) if !key.trim().is_empty() => Self::new(key),
            _ => Err(NarrativeError::MissingApiKey(API_KEY_VAR)),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl NarrativeSource for OpenAiNarrative {
    fn name(&self) -> &str {
        "openai"
    }

    fn narrate(&self, request: &NarrativeRequest<'_>) -> Result<Narrative, NarrativeError> {
        let prompt = build_prompt(request);
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            max_tokens: 400,
            temperature: 0.3,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        debug!(model = %self.model, "calling OpenAI chat completions");

        let resp = self
            .client
            .post(ENDPOINT)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(NarrativeError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let chat: ChatResponse = resp
            .json()
            .map_err(|e| NarrativeError::BadResponse(format!("chat response: {e}")))?;
        let model = chat.model.or_else(|| Some(self.model.clone()));
        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| NarrativeError::BadResponse("empty choices".into()))?;

        let mut narrative = parse_reply(&content)?;
        narrative.model = model;
        Ok(narrative)
    }
}

fn build_prompt(request: &NarrativeRequest<'_>) -> String {
    let m = request.metrics;
    let c = request.classification;
    format!(
        "Analyze this bull put credit spread trading opportunity:

STOCK DATA:
- Current Price: ${price:.2}
- RSI (14-day): {rsi:.1}
- Drop from 20-day High: {drop:.2}%
- 5-day Change: {r5:.2}%
- 10-day Change: {r10:.2}%
- Max Recent Drop: {max_drop:.2}%
- Days Oversold (RSI<30): {days}
- Distance from Recent Low: +{from_low:.2}%
- 200-day MA: ${ma200:.2} (price {vs_ma:+.2}% vs MA)

ALGORITHM ASSESSMENT:
- Trade Signal: {signal}
- Tier: {tier}
- Reason: {reason}
- Confidence Score: {confidence:.2}/1.0

As an expert options trader, provide a concise analysis including:
1. Your assessment of this bull put credit spread opportunity
2. Key risk factors to consider
3. Market timing assessment
4. Specific entry/exit recommendations
5. Position sizing suggestions

Keep the commentary under 200 words and focus on actionable insights.
Reply with a JSON object: {{\"commentary\": string, \"confidence\": number between 0 and 1}}.",
        price = m.current_price,
        rsi = m.rsi,
        drop = m.percent_drop,
        r5 = m.rolling_5d_drop,
        r10 = m.rolling_10d_drop,
        max_drop = m.max_recent_drop,
        days = m.days_oversold,
        from_low = m.distance_from_low,
        ma200 = m.ma200,
        vs_ma = m.price_vs_200ma,
        signal = if c.play { "PLAY" } else { "PASS" },
        tier = c.tier,
        reason = c.reason,
        confidence = request.algorithmic_confidence,
    )
}

fn parse_reply(content: &str) -> Result<Narrative, NarrativeError> {
    let reply: Reply = serde_json::from_str(content.trim())
        .map_err(|e| NarrativeError::BadResponse(format!("reply is not the expected JSON: {e}")))?;
    if reply.commentary.trim().is_empty() {
        return Err(NarrativeError::BadResponse("empty commentary".into()));
    }
    Ok(Narrative {
        commentary: reply.commentary.trim().to_string(),
        confidence: reply.confidence,
        model: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::classifier::classify;
    use crate::config::RuleConfig;
    use crate::domain::MetricSet;

    fn metrics() -> MetricSet {
        MetricSet {
            current_price: 85.0,
            rsi: 22.5,
            percent_drop: -15.0,
            distance_from_low: 0.0,
            ma200: 99.925,
            max_recent_drop: -15.0,
            rolling_5d_drop: -15.0,
            rolling_10d_drop: -15.0,
            days_oversold: 1,
            price_vs_200ma: -14.94,
        }
    }

    #[test]
    fn prompt_carries_metrics_and_assessment() {
        let m = metrics();
        let c = classify(&m, &RuleConfig::default());
        let prompt = build_prompt(&NarrativeRequest {
            metrics: &m,
            classification: &c,
            algorithmic_confidence: 0.87,
        });
        assert!(prompt.contains("Current Price: $85.00"));
        assert!(prompt.contains("RSI (14-day): 22.5"));
        assert!(prompt.contains("Trade Signal: PLAY"));
        assert!(prompt.contains("Tier: tier_1"));
        assert!(prompt.contains("Confidence Score: 0.87/1.0"));
        assert!(prompt.contains("\"confidence\""));
    }

    #[test]
    fn parses_json_reply() {
        let n = parse_reply(r#" {"commentary": " Sell the 76.5/74 spread. ", "confidence": 0.7} "#)
            .unwrap();
        assert_eq!(n.commentary, "Sell the 76.5/74 spread.");
        assert_eq!(n.confidence, Some(0.7));
    }

    #[test]
    fn confidence_is_optional() {
        let n = parse_reply(r#"{"commentary": "Pass."}"#).unwrap();
        assert_eq!(n.confidence, None);
    }

    #[test]
    fn rejects_prose_reply() {
        let err = parse_reply("I think this is a good trade.").unwrap_err();
        assert!(matches!(err, NarrativeError::BadResponse(_)));
    }

    #[test]
    fn rejects_empty_commentary() {
        assert!(parse_reply(r#"{"commentary": "  ", "confidence": 0.5}"#).is_err());
    }
}
