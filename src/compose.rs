//! Prompt composition for each pipeline stage.
//!
//! Later stages consume earlier stages' recorded outputs verbatim: the TTS
//! and storyboard prompts embed the full script, the video-prompt stage
//! embeds the storyboard, and the SEO stage embeds a fixed-length prefix of
//! the script. Thumbnail and hook prompts depend only on the title.

use crate::pipeline::session::{SessionInputs, SessionResults};
use crate::stage::StageId;
use thiserror::Error;

/// System instruction sent with every stage request.
pub const SYSTEM_INSTRUCTION: &str = "\
You are an AI system producing 100% faceless personal-finance YouTube content for working professionals.
Hard rules:
- Fully faceless: no characters, no personal anecdotes.
- Tone: calm, slow, analytical, introspective.
- Written for viewers watching late at night after work.
- No lecturing, no moralizing.
- Plain text only, never tables.
- Every output must stay consistent in duration and logic.";

/// How much of the script the SEO stage sees.
pub const SCRIPT_PREVIEW_CHARS: usize = 500;

#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("stage {stage} requires the `{slot}` output, which has not been generated")]
    MissingDependency { stage: StageId, slot: &'static str },
}

fn require<'a>(
    results: &'a SessionResults,
    stage: StageId,
    dependency: StageId,
) -> Result<&'a str, ComposeError> {
    results
        .get(dependency.slot())
        .ok_or(ComposeError::MissingDependency {
            stage,
            slot: dependency.slot(),
        })
}

/// Builds the generation prompt for a stage from the session inputs and the
/// outputs accumulated so far.
pub fn compose(
    stage: StageId,
    inputs: &SessionInputs,
    results: &SessionResults,
) -> Result<String, ComposeError> {
    let prompt = match stage {
        StageId::Script => format!(
            "[PART 1] WRITE THE MASTER SCRIPT\n\
             Video title: \"{}\"\n\
             User brief: \"{}\"\n\n\
             Requirements:\n\
             - Write the complete script, word by word.\n\
             - Target length: ~6-7 minutes (~900-1,100 words).\n\
             - Break into paragraphs that follow the spoken rhythm.\n\
             - Calm, reflective voice aimed at working professionals.",
            inputs.title, inputs.brief
        ),
        StageId::Tts => {
            let script = require(results, stage, StageId::Script)?;
            format!(
                "[PART 2] CONVERT SCRIPT TO TTS-READY TEXT\n\
                 Script:\n{script}\n\n\
                 Requirements:\n\
                 You are a text-to-speech markup specialist.\n\
                 - Convert the whole script into one continuous read.\n\
                 - Insert reflective pauses using <break time=0.5s/>, <break time=1s/>, <break time=1.5s/>.\n\
                 - Never put quotation marks inside break tags.\n\
                 - Output only the TTS-ready text."
            )
        }
        StageId::Storyboard => {
            let script = require(results, stage, StageId::Script)?;
            format!(
                "[PART 3] CREATE A TEXT STORYBOARD\n\
                 Script:\n{script}\n\n\
                 Requirements:\n\
                 You are a top-1% YouTube content creator.\n\
                 - Produce the storyboard as plain text.\n\
                 - Each scene matches the script's timing exactly.\n\
                 - Describe faceless, everyday imagery with low-key lighting.\n\
                 - No tables. Do not invent new content."
            )
        }
        StageId::VideoPrompts => {
            let storyboard = require(results, stage, StageId::Storyboard)?;
            format!(
                "[PART 4] TEXT-TO-VIDEO PROMPTS\n\
                 Storyboard:\n{storyboard}\n\n\
                 Requirements:\n\
                 You are an expert video-prompt writer.\n\
                 - One prompt per storyboard scene.\n\
                 - Written in English as cinematic shot descriptions.\n\
                 - Do not merge scenes or generate media.\n\
                 - Style: cinematic, minimal, faceless, dark tone."
            )
        }
        StageId::Thumbnails => format!(
            "[PART 5] A/B TEST THUMBNAILS - 3 CONCEPTS\n\
             Topic: {}\n\n\
             Requirements:\n\
             Create 3 faceless thumbnail concepts (1. Confusion, 2. Self-doubt, 3. Silent pressure).\n\
             Each concept includes:\n\
             1. A detailed image description.\n\
             2. Thumbnail text (one short line, upper case).\n\
             3. An image-generation prompt (English, cinematic style).\n\
             Shared style: faceless, dark, serious.",
            inputs.title
        ),
        StageId::Hooks => format!(
            "[PART 6] 5-SECOND RETENTION HOOKS\n\
             Topic: {}\n\n\
             Requirements:\n\
             Write 5 different 5-second hooks.\n\
             - One or two short sentences each.\n\
             - Phrased as a question or a contradiction.\n\
             - Aimed straight at the psychology of working professionals.\n\
             - Suited to late-night viewing.\n\
             List only the hook text.",
            inputs.title
        ),
        StageId::Seo => {
            let script = require(results, stage, StageId::Script)?;
            let preview: String = script.chars().take(SCRIPT_PREVIEW_CHARS).collect();
            format!(
                "[PART 7] YOUTUBE SEO TITLE & DESCRIPTION\n\
                 Primary title: {}\n\
                 Video content: {preview}...\n\n\
                 Requirements:\n\
                 You are a YouTube SEO expert.\n\
                 - Write 3 A/B-test titles (high CTR, neutral, analytical).\n\
                 - Write an SEO description (150-250 words).\n\
                 - Write hashtags.\n\
                 - Write a comma-separated keyword list.",
                inputs.title
            )
        }
    };
    Ok(prompt)
}
