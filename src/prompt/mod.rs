use crate::context::CompanyContext;
use crate::errors::ComposeError;
use crate::registry::{dims, PersonaProfile, Registry};
use crate::wire::{
    ComposedPrompt, ContentKind, GenerationRequest, SeoArticleRequest, SocialPostRequest,
    VideoScriptRequest,
};

const NONE_SPECIFIED: &str = "None specified";

const SOCIAL_SECTIONS: &[(&str, &str)] = &[
    ("MAIN CONTENT", "the actual post text"),
    ("HASHTAGS", "platform-appropriate"),
    ("POSTING TIPS", "2-3 specific tips for this post"),
    ("BEST TIME TO POST", "recommended timing"),
    ("SUGGESTED VISUAL", "description of ideal accompanying image/video"),
];

const VIDEO_SECTIONS: &[(&str, &str)] = &[
    ("FULL SCRIPT", "with timestamps and speaker directions"),
    ("B-ROLL SUGGESTIONS", "visual elements to include"),
    ("ON-SCREEN TEXT/GRAPHICS", "key points to display"),
    ("MUSIC/SOUND RECOMMENDATIONS", "mood and pacing"),
    ("THUMBNAIL CONCEPT", "for YouTube/TikTok"),
    ("CAPTION/DESCRIPTION", "for posting"),
    ("HASHTAGS", "platform-appropriate"),
];

const SEO_SECTIONS: &[(&str, &str)] = &[
    ("META TITLE", "50-60 characters"),
    ("META DESCRIPTION", "150-160 characters"),
    ("FULL CONTENT", "with proper heading structure"),
    ("KEYWORD DENSITY ANALYSIS", "primary and secondary keywords"),
    ("INTERNAL LINKING SUGGESTIONS", "anchor text and target page"),
    ("FEATURED SNIPPET OPTIMIZATION", "structured for position zero"),
    ("FAQ SECTION", "for additional keyword targeting"),
    ("SCHEMA MARKUP SUGGESTIONS", "schema.org types to add"),
];

/// Section headings the model is asked to return, in order.
pub fn output_sections(kind: ContentKind) -> Vec<&'static str> {
    let sections = match kind {
        ContentKind::SocialPost => SOCIAL_SECTIONS,
        ContentKind::VideoScript => VIDEO_SECTIONS,
        ContentKind::SeoArticle => SEO_SECTIONS,
    };
    sections.iter().map(|(name, _)| *name).collect()
}

/// Render a request into instruction text. Pure: the same request, registry
/// and company context always produce the same string.
pub fn compose(
    request: &GenerationRequest,
    registry: &Registry,
    company: &CompanyContext,
) -> Result<ComposedPrompt, ComposeError> {
    let text = match request {
        GenerationRequest::SocialPost(r) => social_post_prompt(r, registry, company)?,
        GenerationRequest::VideoScript(r) => video_script_prompt(r, registry, company)?,
        GenerationRequest::SeoArticle(r) => seo_article_prompt(r, registry, company)?,
    };
    tracing::debug!(kind = ?request.kind(), chars = text.len(), "composed prompt");
    Ok(ComposedPrompt::new(text, request.clone()))
}

fn require<'a>(field: &str, value: &'a str) -> Result<&'a str, ComposeError> {
    let v = value.trim();
    if v.is_empty() {
        return Err(ComposeError::MissingRequiredField(field.to_string()));
    }
    Ok(v)
}

fn or_none(value: &str) -> &str {
    let v = value.trim();
    if v.is_empty() {
        NONE_SPECIFIED
    } else {
        v
    }
}

fn bullets(items: &[String]) -> String {
    items.iter().map(|i| format!("- {i}")).collect::<Vec<_>>().join("\n")
}

fn numbered(items: &[&str]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(n, i)| format!("{}. {}", n + 1, i))
        .collect::<Vec<_>>()
        .join("\n")
}

fn output_contract(sections: &[(&str, &str)]) -> String {
    let lines: Vec<String> = sections
        .iter()
        .map(|(name, hint)| format!("{name} ({hint})"))
        .collect();
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    numbered(&refs)
}

fn persona_block(p: &PersonaProfile) -> String {
    format!(
        "TARGET PERSONA: {name} ({description})
PERSONA PAIN POINTS:
{pains}
PERSONA MOTIVATORS:
{motivators}
",
        name = p.name,
        description = p.description,
        pains = bullets(&p.pain_points),
        motivators = bullets(&p.motivators),
    )
}

pub fn social_post_prompt(
    r: &SocialPostRequest,
    registry: &Registry,
    company: &CompanyContext,
) -> Result<String, ComposeError> {
    let platform = require("platform", &r.platform)?;
    let content_type = require("content_type", &r.content_type)?;
    let tone = require("tone", &r.tone)?;
    let topic = require("topic", &r.topic)?;

    let spec = registry.platform(dims::PLATFORM, platform)?;
    let goal = registry.text(dims::CONTENT_TYPE, content_type, "description")?;
    let tone_descriptor = registry.text(dims::TONE, tone, "tone_descriptor")?;
    let persona = match r.persona.as_deref().map(str::trim) {
        Some(p) if !p.is_empty() => persona_block(&registry.persona(p)?),
        _ => String::new(),
    };
    let audience = if r.audience.trim().is_empty() { "Not specified" } else { r.audience.trim() };

    Ok(format!(
        "You are an expert social media content strategist and copywriter specializing in B2B SaaS marketing.

COMPANY INFORMATION:
{company}

PLATFORM: {platform}
CONTENT TYPE: {content_type}
CONTENT GOAL: {goal}
TOPIC/THEME: {topic}

PLATFORM SPECIFICATIONS:
- Maximum Characters: {max_chars}
- Recommended Hashtags: {hashtags}
- Tone: {platform_tone}
- Format: {format}

BEST PRACTICES FOR {platform_upper}:
{practices}

TARGET AUDIENCE: {audience}
DESIRED TONE: {tone} ({tone_descriptor})
{persona}
ADDITIONAL CONTEXT/REQUIREMENTS:
{context}

TASK:
Create a compelling {content_type_lower} for {platform} about \"{topic}\".

The content should:
1. Be optimized for {platform}'s algorithm and best practices
2. Include a strong hook/opening
3. Provide genuine value to the target audience
4. Include a clear call-to-action
5. Be formatted appropriately for the platform
6. Include relevant hashtags (exact number: {hashtags})
7. Stay within {max_chars} characters

OUTPUT FORMAT:
Provide the ready-to-post content with:
{contract}

Make the content engaging, authentic, and aligned with the company's voice while following all platform best practices.",
        company = company.text(),
        platform = platform,
        content_type = content_type,
        goal = goal,
        topic = topic,
        max_chars = spec.max_chars,
        hashtags = spec.hashtag_count,
        platform_tone = spec.tone_descriptor,
        format = spec.format,
        platform_upper = platform.to_uppercase(),
        practices = bullets(&spec.best_practices),
        audience = audience,
        tone = tone,
        tone_descriptor = tone_descriptor,
        persona = persona,
        context = or_none(&r.additional_context),
        content_type_lower = content_type.to_lowercase(),
        contract = output_contract(SOCIAL_SECTIONS),
    ))
}

pub fn video_script_prompt(
    r: &VideoScriptRequest,
    registry: &Registry,
    company: &CompanyContext,
) -> Result<String, ComposeError> {
    let platform = require("platform", &r.platform)?;
    let video_type = require("video_type", &r.video_type)?;
    let duration = require("duration", &r.duration)?;
    let style = require("style", &r.style)?;
    let topic = require("topic", &r.topic)?;

    let meta = registry.get_metadata(dims::VIDEO_PLATFORM, platform)?;
    let format = meta.text("format").unwrap_or_default();
    let hashtags = meta.number("hashtag_count").unwrap_or_default();
    let type_goal = registry.text(dims::VIDEO_TYPE, video_type, "description")?;
    let pacing = registry.text(dims::VIDEO_DURATION, duration, "description")?;
    let style_notes = registry.text(dims::VIDEO_STYLE, style, "description")?;

    Ok(format!(
        "You are an expert video content strategist and scriptwriter specializing in B2B SaaS marketing.

COMPANY INFORMATION:
{company}

PLATFORM: {platform}
PLATFORM FORMAT: {format}
VIDEO TYPE: {video_type} ({type_goal})
TOPIC: {topic}
TARGET DURATION: {duration}
PACING: {pacing}
PRODUCTION STYLE: {style} ({style_notes})

ADDITIONAL CONTEXT:
{context}

TASK:
Create a complete video script for a {video_type} about \"{topic}\" for {platform}.

The script should include:
1. HOOK (First 3 seconds) - Attention-grabbing opening
2. INTRO (5-10 seconds) - Brief context setting
3. MAIN CONTENT - Structured body with clear sections
4. CALL TO ACTION - What viewers should do next
5. OUTRO - Memorable closing

OUTPUT FORMAT:
Provide a complete script with:
{contract}

Use exactly {hashtags} hashtags. Make it engaging, informative, and optimized for {platform}'s algorithm.",
        company = company.text(),
        platform = platform,
        format = format,
        video_type = video_type,
        type_goal = type_goal,
        topic = topic,
        duration = duration,
        pacing = pacing,
        style = style,
        style_notes = style_notes,
        context = or_none(&r.additional_context),
        contract = output_contract(VIDEO_SECTIONS),
        hashtags = hashtags,
    ))
}

pub fn seo_article_prompt(
    r: &SeoArticleRequest,
    registry: &Registry,
    company: &CompanyContext,
) -> Result<String, ComposeError> {
    let content_type = require("content_type", &r.content_type)?;
    let keyword = require("primary_keyword", &r.primary_keyword)?;
    let intent = require("search_intent", &r.search_intent)?;
    if r.word_count == 0 {
        return Err(ComposeError::MissingRequiredField("word_count".to_string()));
    }

    let content_goal = registry.text(dims::SEO_CONTENT_TYPE, content_type, "description")?;
    let intent_notes = registry.text(dims::SEARCH_INTENT, intent, "description")?;
    let words = registry
        .get_metadata(dims::WORD_COUNT, &r.word_count.to_string())?
        .number("words")
        .unwrap_or_default();

    Ok(format!(
        "You are an expert SEO content strategist and writer specializing in B2B SaaS marketing.

COMPANY INFORMATION:
{company}

CONTENT TYPE: {content_type} ({content_goal})
PRIMARY KEYWORD: {keyword}
SECONDARY KEYWORDS: {secondary}
TARGET WORD COUNT: {words}
SEARCH INTENT: {intent} ({intent_notes})

ADDITIONAL CONTEXT:
{context}

TASK:
Create SEO-optimized content for \"{keyword}\".

The content should:
1. Naturally incorporate the primary keyword in title, headers, and body
2. Include secondary keywords throughout
3. Follow on-page SEO best practices
4. Match the {intent_lower} search intent
5. Provide genuine value to readers
6. Include internal linking opportunities
7. Be structured with proper H1, H2, H3 hierarchy

OUTPUT FORMAT:
Provide complete content with:
{contract}

Make it comprehensive, authoritative, and optimized for search intent.",
        company = company.text(),
        content_type = content_type,
        content_goal = content_goal,
        keyword = keyword,
        secondary = or_none(&r.secondary_keywords),
        words = words,
        intent = intent,
        intent_notes = intent_notes,
        intent_lower = intent.to_lowercase(),
        context = or_none(&r.additional_context),
        contract = output_contract(SEO_SECTIONS),
    ))
}
