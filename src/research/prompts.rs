//! Prompt templates for each model call in the research loop.
//!
//! Every formatter is a pure function of its arguments: no dates, no
//! randomness. Calling one twice with the same state yields the same bytes.

use super::risk::RiskCategory;
use super::state::{clean_json_response, ResearchState};
use crate::llm::Message;

/// Characters of prior findings shown to the query generator
pub const QUERY_FINDINGS_WINDOW: usize = 4_000;

/// Characters of findings given to the entity extractor
pub const EXTRACTION_FINDINGS_WINDOW: usize = 8_000;

/// Characters of findings given to the risk scorer
pub const RISK_FINDINGS_WINDOW: usize = 10_000;

/// Characters of findings given to the report writer
pub const REPORT_FINDINGS_WINDOW: usize = 25_000;

/// Number of queries requested per iteration
pub const QUERIES_PER_ITERATION: usize = 8;

/// Last `n` characters of `text`, cut on a char boundary.
pub fn tail_chars(text: &str, n: usize) -> &str {
    let total = text.chars().count();
    if total <= n {
        return text;
    }
    let skip = total - n;
    match text.char_indices().nth(skip) {
        Some((idx, _)) => &text[idx..],
        None => "",
    }
}

/// Generic investigative queries used when query generation fails.
pub fn fallback_queries(target: &str) -> Vec<String> {
    vec![
        format!("{target} biography career timeline"),
        format!("{target} controversy scandal investigation"),
        format!("{target} lawsuit legal criminal charges"),
        format!("{target} company business financial"),
        format!("{target} news recent developments"),
        format!("{target} education background"),
        format!("{target} board members associates"),
        format!("{target} regulatory violations SEC FTC"),
    ]
}

/// Parse the query generator's answer: a non-empty JSON array of strings.
pub fn parse_query_list(response: &str) -> Option<Vec<String>> {
    let values: Vec<serde_json::Value> = serde_json::from_str(clean_json_response(response)).ok()?;

    let mut queries = Vec::with_capacity(values.len());
    for value in values {
        let query = value.as_str()?.trim();
        if !query.is_empty() {
            queries.push(query.to_string());
        }
    }

    if queries.is_empty() {
        None
    } else {
        Some(queries)
    }
}

/// Prompt templates for the due-diligence workflow
pub struct DiligencePrompts;

impl DiligencePrompts {
    /// Query generation: system + user messages.
    pub fn query_generation(state: &ResearchState) -> Vec<Message> {
        let mut qualifiers = String::new();
        for (label, value) in [
            ("CONTEXT", &state.context),
            ("FOCUS AREAS", &state.focus),
            ("TIME PERIOD", &state.time_period),
            ("INDUSTRY", &state.industry),
            ("LOCATION", &state.location),
        ] {
            if !value.is_empty() {
                qualifiers.push_str(&format!("{label}: {value}\n"));
            }
        }

        let focus_instruction = if state.focus.is_empty() {
            String::new()
        } else {
            format!("\n- Prioritize these focus areas: {}", state.focus)
        };

        let previous = if state.all_findings.trim().is_empty() {
            "None (first iteration)"
        } else {
            tail_chars(&state.all_findings, QUERY_FINDINGS_WINDOW)
        };

        let prompt = format!(
            r#"You are conducting deep due-diligence research. Generate strategic search queries that surface everything publicly known about the target.

TARGET: {target}
{qualifiers}
CURRENT DEPTH: {depth}/{max_depth}
PREVIOUS FINDINGS:
{previous}

Generate exactly {count} distinct, highly specific search queries covering:
1. Professional history, education, career transitions and employment timeline
2. Financial connections, investments, funding rounds and business dealings
3. Lawsuits, criminal charges, regulatory actions, investigations and court records
4. Controversies, media coverage, scandals and ethical concerns
5. Business partners, board memberships and other associations
6. Academic background, publications and patents
7. Corporate governance, leadership roles and affiliations
8. Recent developments and ongoing matters

Requirements:
- Be specific and investigative; use search operators (site:, quotes, OR, date ranges) where useful
- Build on the previous findings instead of repeating them
- Prefer authoritative sources: court records, regulatory filings, investigative journalism
- Name companies, timeframes and case numbers when the findings mention them
- Look for both achievements and adverse incidents{focus_instruction}

Depth strategy: early depths discover the main facts, middle depths dig into connections and timeline details, the final depth closes gaps and checks contradictions.

Return ONLY a JSON array of {count} query strings, nothing else:
["query 1", "query 2", "..."]"#,
            target = state.target,
            qualifiers = qualifiers,
            depth = state.depth,
            max_depth = state.max_depth,
            previous = previous,
            count = QUERIES_PER_ITERATION,
            focus_instruction = focus_instruction,
        );

        vec![
            Message::system("You are an expert investigative researcher."),
            Message::user(prompt),
        ]
    }

    /// Entity extraction: one prompt over the latest findings window.
    pub fn entity_extraction(state: &ResearchState) -> String {
        format!(
            r#"You extract structured information from unstructured research notes.

Analyze the following findings about {target}.

=== RESEARCH DATA ===
{findings}

Extract people (with role and relationship to the target), organizations, locations, dated events, financial facts and legal matters.

Return ONLY valid JSON in this structure:
{{
  "people": [{{"name": "Full Name", "role": "description", "relationship": "to target"}}],
  "organizations": [{{"name": "Org Name", "type": "company/agency/etc", "relationship": "description"}}],
  "locations": [{{"place": "Location", "context": "why mentioned"}}],
  "timeline": [{{"date": "YYYY-MM-DD or YYYY", "event": "what happened"}}],
  "financial": [{{"amount": "$X", "context": "description", "date": "when"}}],
  "legal": [{{"type": "lawsuit/charge/settlement", "description": "details", "date": "when", "outcome": "result if known"}}]
}}

Use an empty array for a category with no data. Be precise and factual."#,
            target = state.target,
            findings = tail_chars(&state.all_findings, EXTRACTION_FINDINGS_WINDOW),
        )
    }

    /// Risk analysis: (system prompt, user prompt).
    pub fn risk_analysis(state: &ResearchState) -> (String, String) {
        let system = "You are a professional risk analyst specializing in due diligence and background investigations. \
You analyze information about individuals and assess risk across multiple dimensions.\n\n\
Provide structured, evidence-based assessments with clear justifications and confidence levels."
            .to_string();

        let categories = RiskCategory::ALL
            .iter()
            .enumerate()
            .map(|(i, c)| {
                format!(
                    "{}. **{} Risk ({}% weight)**: {}",
                    i + 1,
                    c.label(),
                    c.weight(),
                    c.scope()
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        let schema = RiskCategory::ALL
            .iter()
            .map(|c| {
                format!(
                    r#"  "{}": {{"score": 0, "confidence": "Low", "evidence": ["fact"], "severity": "description"}},"#,
                    c.key()
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        let user = format!(
            r#"Analyze the following information about {target} and provide a risk assessment.

=== AVAILABLE INFORMATION ===
{findings}

Score each of these categories from 0 (no risk) to 100 (extreme risk):

{categories}

For each category give:
- score (0-100)
- confidence (Low/Medium/High) based on evidence quality
- evidence: specific facts supporting the score
- severity: the potential impact if realized

Then calculate the weighted total risk score.

Return your analysis in this exact JSON structure:
{{
{schema}
  "total_risk_score": 0,
  "overall_assessment": "2-3 sentence summary"
}}

Base the assessment ONLY on the information provided. Where evidence is thin, say so through the confidence levels."#,
            target = state.target,
            findings = tail_chars(&state.all_findings, RISK_FINDINGS_WINDOW),
            categories = categories,
            schema = schema,
        );

        (system, user)
    }

    /// Report synthesis: (system prompt, user prompt).
    pub fn report(state: &ResearchState) -> (String, String) {
        let system = "You are a professional intelligence analyst.".to_string();

        let category_sections = RiskCategory::ALL
            .iter()
            .map(|c| format!("### {} Risk\n{}; cite specific evidence with dates and sources.", c.label(), c.scope()))
            .collect::<Vec<_>>()
            .join("\n\n");

        let user = format!(
            r#"You are writing a comprehensive risk assessment report that will inform critical due-diligence decisions.

TARGET: {target}

=== RESEARCH SUMMARY ===
Search Iterations: {depth}
Total Sources: {num_sources}

=== EXTRACTED ENTITIES ===
{entities}

=== RISK ANALYSIS ===
{risk_analysis}

=== RAW FINDINGS ===
{findings}

Write the report in Markdown with this structure:

# Risk Assessment Report: {target}

## Executive Summary
Four to five paragraphs: overall risk level and key drivers, the most significant findings, the critical timeline, major red flags, and a recommendation summary.

## Background & Profile
Full name, education (institutions, degrees, years), professional history, notable achievements.

## Detailed Professional Timeline
Every major position with company, title and dates; transitions, board roles and ventures.

## Key Findings by Category

{category_sections}

## Comprehensive Timeline of Events
Chronological list with precise dates, descriptions, significance and sources.

## Network Analysis & Notable Associations
Key individuals and organizations, their relationships to the target and current status.

## Deep Dive: Critical Incidents
For each major incident: what happened, timeline, key players, financial, legal and reputational impact.

## Source Analysis & Confidence Assessment
Sources by type, primary versus secondary, confidence per major finding, gaps and contradictions.

## Risk Score Breakdown
For each category: score, justification, evidence, confidence, severity and mitigating factors.

## Recommendations & Conclusions
Risk level classification (Low/Moderate/High/Extreme), recommendations for stakeholders, monitoring and final judgment.

## Appendices
Sources consulted, key legal documents, significant dates, network description.

---

Requirements:
- Be factual and cite specific findings with dates, amounts and names
- Do not speculate beyond the evidence, but analyze implications
- State information gaps explicitly
- Write for an executive audience that needs thoroughness"#,
            target = state.target,
            depth = state.depth,
            num_sources = state.num_sources,
            entities = state.entities.prompt_text(),
            risk_analysis = state.risk_analysis.prompt_text(),
            findings = tail_chars(&state.all_findings, REPORT_FINDINGS_WINDOW),
            category_sections = category_sections,
        );

        (system, user)
    }
}
