// All LLM prompt constants for the Tailoring module.
//
// The section markers embedded in the template are the same literals the
// parser searches for — changing one side requires changing the other, and
// the test below pins that coordination.

/// System prompt for tailoring — enforces factual grounding and the
/// marker-wrapped output structure.
pub const TAILOR_SYSTEM: &str = "You are an expert resume writer tailoring a job application. \
    Use ONLY facts already present in the candidate's resume. \
    Do NOT invent experience, skills, achievements, or metrics. \
    Do NOT change dates, companies, or job titles. \
    You MUST wrap each output section in its exact literal start/end markers. \
    Do NOT emit any text outside the marked sections.";

/// Tailoring prompt template.
/// Replace: {resume_text}, {job_text}, {match_summary}
pub const TAILOR_PROMPT_TEMPLATE: &str = r#"Tailor the resume below for the target job, then write a cover letter and list the changes you made.

RESUME (source of truth — use only this content):
{resume_text}

TARGET JOB DESCRIPTION:
{job_text}

PRIOR MATCH ANALYSIS (may be empty — use only to decide what to emphasize):
{match_summary}

HARD RULES:
1. Only reorder, rephrase, and re-emphasize content already in the resume
2. Keep every date, company, and title exactly as written
3. Incorporate job-description keywords only where the resume supports them
4. The cover letter is three paragraphs, professional and specific — no clichés
5. List one change description per line in the changes section

Produce exactly three sections, in this order, each wrapped in its markers:

[START_RESUME]
The full tailored resume text.
[END_RESUME]

[START_COVER_LETTER]
The cover letter.
[END_COVER_LETTER]

[START_CHANGES]
One change description per line.
[END_CHANGES]"#;
