use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::app::{BattlecardError, Result};
use crate::config::CompanyProfile;
use crate::domain::{CompetitorAnalysis, ExtractedProfile, Swot, TalkingPoints};
use crate::extractor::{parse_json_payload, Extractor};

const MESSAGES_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";

const EXTRACTION_PROMPT: &str = r#"You are a competitive intelligence analyst. Analyze the following content from a competitor's website and extract structured information.

IMPORTANT: For pricing tiers, you MUST extract the actual numerical price if present (e.g., "$10", "$15/month", "€99/year"). Look for patterns like:
- Dollar/currency amounts: $10, €15, £20
- Per-unit pricing: $10/user, $15/seat, $99/member
- Monthly/annual: $10/month, $120/year, $8 billed annually
If a price appears as both monthly and annual, prefer the monthly price.

MULTI-DIMENSIONAL PRICING: Some products have multiple pricing dimensions (e.g., different seat types like "Viewer", "Editor", "Full seat" OR different modules). When you detect this:
1. Set "hasSeatTypes" to true and list all seat/license types in "seatTypes"
2. For each tier, include ALL seat type prices in the "seatPrices" object
3. Use the most comprehensive seat type (full access) as the main "price" field

Return ONLY valid JSON matching this exact schema (no markdown, no explanation):

{
  "companyName": "string - inferred company name",
  "pricing": {
    "tiers": [
      {
        "name": "string",
        "price": "string (include currency symbol) - use most comprehensive seat type if multiple exist",
        "billingPeriod": "string or null (e.g., 'per user/month')",
        "priceModel": "free | per_seat | flat | usage_based | contact_sales",
        "targetCustomer": "string - who this tier is for",
        "keyFeatures": ["string"],
        "limitations": ["string"],
        "confidence": "high | medium | low",
        "seatPrices": "object or null - e.g., {'Full seat': '$15', 'Editor': '$10', 'Viewer': 'Free'}"
      }
    ],
    "hasSeatTypes": "boolean - true if multiple seat/license types exist",
    "seatTypes": ["string - list of seat types if hasSeatTypes is true"],
    "hasFreeTier": boolean,
    "hasEnterpriseTier": boolean,
    "trialAvailable": boolean,
    "trialDuration": "string or null"
  },
  "features": {
    "highlighted": ["string - features they emphasize"],
    "byTier": {
      "TierName": ["string - features in this tier"]
    }
  },
  "positioning": {
    "tagline": "string or null",
    "targetCustomers": ["string"],
    "differentiators": ["string - what they claim makes them unique"],
    "valuePropositions": ["string"]
  },
  "socialProof": {
    "customerLogos": ["string - company names"],
    "metricsClaimed": ["string - statistics they cite"],
    "caseStudies": ["string - case study titles or references"],
    "awards": ["string"],
    "partnerships": ["string - integration partners"]
  },
  "callsToAction": {
    "primary": "string - main CTA",
    "secondary": ["string"],
    "urgencyLanguage": "string or null"
  },
  "extractedQuotes": [
    {
      "text": "string - exact quote from source",
      "category": "pricing | positioning | social_proof | feature",
      "location": "string - where on page (if determinable)"
    }
  ]
}

If a field cannot be determined from the content, use null for strings, empty arrays for lists, or "low" confidence and your best inference.

SOURCE CONTENT:
---
{content}
---"#;

const SWOT_PROMPT: &str = r#"You are a competitive strategy expert. Given information about a competitor and a user's company, generate a SWOT analysis.

Return ONLY valid JSON matching this exact schema (no markdown, no explanation):

{
  "strengths": ["string - our advantages over this competitor"],
  "weaknesses": ["string - areas where competitor has advantage"],
  "opportunities": ["string - market opportunities we can exploit"],
  "threats": ["string - competitive threats they pose"],
  "summary": "string - 2-3 sentence executive summary"
}

YOUR COMPANY:
{myCompany}

COMPETITOR ANALYSIS:
{competitorData}"#;

const TALKING_POINTS_PROMPT: &str = r#"You are a sales enablement expert. Generate talking points and objection handlers for sales reps competing against this competitor.

Return ONLY valid JSON matching this exact schema (no markdown, no explanation):

{
  "elevatorPitch": "string - 30-second pitch positioning against this competitor",
  "keyDifferentiators": [
    {
      "point": "string - our advantage",
      "proof": "string - evidence or example"
    }
  ],
  "objectionHandlers": [
    {
      "objection": "string - what prospect might say about competitor",
      "response": "string - how to handle this objection"
    }
  ],
  "competitiveQuestions": ["string - questions to ask that expose competitor weaknesses"],
  "winThemes": ["string - main themes that help win against this competitor"]
}

YOUR COMPANY:
{myCompany}

COMPETITOR ANALYSIS:
{competitorData}"#;

pub struct AnthropicExtractor {
    client: Client,
    api_key: String,
    model: String,
    max_tokens: usize,
}

impl AnthropicExtractor {
    pub fn new(api_key: String, model: String, max_tokens: usize) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .user_agent("battlecard/0.1.0")
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_key,
            model,
            max_tokens,
        }
    }

    async fn complete(&self, prompt: &str, max_tokens: usize) -> Result<String> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(self.api_key.trim())
                .map_err(|_| BattlecardError::Config("Invalid API key".into()))?,
        );
        headers.insert("anthropic-version", HeaderValue::from_static(API_VERSION));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let body = MessagesRequest {
            model: &self.model,
            max_tokens,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(MESSAGES_ENDPOINT)
            .headers(headers)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(BattlecardError::Other(format!(
                "Extraction API error: {} - {}",
                status, text
            )));
        }

        let parsed: MessagesResponse = response.json().await?;
        let answer = parsed
            .content
            .into_iter()
            .filter_map(|block| match block {
                ResponseBlock::Text { text } => Some(text),
                ResponseBlock::Other => None,
            })
            .collect::<Vec<_>>()
            .join("\n");

        if answer.is_empty() {
            return Err(BattlecardError::ExtractionParse(
                "response missing text content".into(),
            ));
        }
        Ok(answer)
    }

    /// Serialize the competitor sections the generator prompts consume.
    fn competitor_data(analysis: &CompetitorAnalysis) -> Result<String> {
        let data = serde_json::json!({
            "name": analysis.company_name,
            "pricing": analysis.pricing,
            "positioning": analysis.positioning,
            "features": analysis.features,
            "socialProof": analysis.social_proof,
        });
        Ok(serde_json::to_string_pretty(&data)?)
    }

    fn my_company(company: &CompanyProfile) -> String {
        match &company.name {
            Some(name) => format!(
                "Name: {}\nDescription: {}\nKey Strengths: {}",
                name,
                company.description.as_deref().unwrap_or("N/A"),
                company.strengths.as_deref().unwrap_or("N/A"),
            ),
            None => "No company information provided - generate general competitive insights"
                .to_string(),
        }
    }
}

#[async_trait]
impl Extractor for AnthropicExtractor {
    async fn extract(&self, content: &str) -> Result<ExtractedProfile> {
        let prompt = EXTRACTION_PROMPT.replace("{content}", content);
        let text = self.complete(&prompt, self.max_tokens).await?;
        parse_json_payload(&text)
    }

    async fn generate_swot(
        &self,
        analysis: &CompetitorAnalysis,
        company: &CompanyProfile,
    ) -> Result<Swot> {
        let prompt = SWOT_PROMPT
            .replace("{myCompany}", &Self::my_company(company))
            .replace("{competitorData}", &Self::competitor_data(analysis)?);
        let text = self.complete(&prompt, 2048).await?;
        parse_json_payload(&text)
    }

    async fn generate_talking_points(
        &self,
        analysis: &CompetitorAnalysis,
        company: &CompanyProfile,
    ) -> Result<TalkingPoints> {
        let prompt = TALKING_POINTS_PROMPT
            .replace("{myCompany}", &Self::my_company(company))
            .replace("{competitorData}", &Self::competitor_data(analysis)?);
        let text = self.complete(&prompt, 2048).await?;
        parse_json_payload(&text)
    }
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: usize,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ResponseBlock>,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ResponseBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}
