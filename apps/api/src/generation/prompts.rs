// Role prompts for the five pipeline stages.
// Placeholders use `{name}` and are filled by `capability::render_template`.
// JSON examples may use braces freely; only `{lowercase_identifier}` is substituted.

use crate::generation::capability::RoleInstructions;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;

/// System prompt for requirements analysis — JSON only.
pub const ANALYZE_SYSTEM: &str = "You are a hiring strategist who reads job descriptions \
    for what the team actually needs, not just what the posting lists. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object.";

/// Replace: {job_description}
pub const ANALYZE_TEMPLATE: &str = r#"Read the job description and infer what the hiring team is really looking for.

1. Name the target persona in a few words (e.g. "Scrappy Startup Generalist", "Scale-focused Backend Expert").
2. List the hard skills and the soft skills.
3. State the core problem this hire is meant to solve.
4. Collect the keywords an ATS scan would look for.

JOB DESCRIPTION:
{job_description}

Return a JSON object with this schema:
{
  "persona": "",
  "hard_skills": [],
  "soft_skills": [],
  "core_problem": "",
  "keywords": []
}"#;

/// System prompt for evidence mapping — JSON only.
pub const MAP_SYSTEM: &str = JSON_ONLY_SYSTEM;

/// Replace: {job_description}, {target_persona_json}, {profile_json}
pub const MAP_TEMPLATE: &str = r#"Map the most important requirements of this role to the strongest evidence in the candidate's master profile.

RULES:
- 5 to 7 requirements, highest impact first.
- At most 2 evidence items per requirement, each one short sentence (20 words or fewer).
- Prefer the 2-4 most relevant projects and the 2-4 most relevant experience entries.
- Only facts that appear in the master profile.

JOB DESCRIPTION:
{job_description}

TARGET PERSONA:
{target_persona_json}

MASTER PROFILE:
{profile_json}

Return a JSON object with this schema:
{
  "requirement_map": [
    {
      "requirement": "",
      "evidence": [
        {"source": "experience|project|education", "title": "", "detail": ""}
      ]
    }
  ],
  "focus_projects": [],
  "focus_experience": []
}"#;

/// System prompt for resume drafting — plain Markdown output.
pub const RESUME_SYSTEM: &str = "You are an expert technical resume writer. \
    You tailor a candidate's master profile to one specific job. \
    Return Markdown only. Do NOT wrap the output in code fences.";

/// Replace: {grounding_instruction}, {job_description}, {target_persona_json},
///          {requirement_map_json}, {reviewer_instructions}, {profile_json}
pub const RESUME_TEMPLATE: &str = r#"{grounding_instruction}

Write a one-page, ATS-friendly Markdown resume tailored to the job below.

STRUCTURE:
- No header or contact block; it is added at render time.
- Summary: two lines, role focus and specialization.
- Education: degree, institution, dates, GPA if present.
- Work Experience: every role in the profile, framed around scale and impact.
- Technical Projects: kept separate from Work Experience.
- Skills: languages, frameworks, cloud and tools.
- Honors & Awards when relevant.

TAILORING:
- Let the requirement map decide which experiences and projects become bullets.
- Each bullet should land a requirement or keyword from the job where the profile supports it.
- When the reviewer notes call out missing skills, add them only if the profile contains them.

FORMAT:
- `##` for sections, `###` for roles and projects, `-` for bullets.
- A blank line between a date line and its bullets; no blank lines between bullets.
- At most 3 bullets per role and 2 per project, about 18 words each.

JOB DESCRIPTION:
{job_description}

TARGET PERSONA:
{target_persona_json}

REQUIREMENT MAP:
{requirement_map_json}

REVIEWER NOTES (may be empty):
{reviewer_instructions}

MASTER PROFILE:
{profile_json}"#;

/// System prompt for cover letter drafting — plain text output.
pub const COVER_LETTER_SYSTEM: &str = "You are a career coach who writes short, warm, \
    direct cover letters. Return plain text paragraphs only. \
    Do NOT wrap the output in code fences.";

/// Replace: {grounding_instruction}, {job_description}, {target_persona_json},
///          {requirement_map_json}, {reviewer_instructions}, {profile_json}
pub const COVER_LETTER_TEMPLATE: &str = r#"{grounding_instruction}

Write a cover letter for the job below. Clear, direct, human; not stiff.

STRUCTURE:
- No header, contact block or sign-off; those are added at render time.
- Open with "Hello," unless the job names a person.
- Hook: interest in this role at this company.
- Experience paragraph: tie the job's requirements to specific work experience.
- Projects paragraph: tie technical projects and their stack to the role's needs.
- Close: restate the value the candidate brings.
- At most 4 short paragraphs, separated by blank lines.

JOB DESCRIPTION:
{job_description}

TARGET PERSONA:
{target_persona_json}

REQUIREMENT MAP:
{requirement_map_json}

REVIEWER NOTES (may be empty):
{reviewer_instructions}

MASTER PROFILE:
{profile_json}"#;

/// System prompt for the critique — JSON only.
pub const CRITIQUE_SYSTEM: &str = "You review application packages as both an HR manager \
    and an ATS scanner. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object.";

/// Replace: {job_description}, {target_persona_json}, {requirement_map_json},
///          {resume_artifact}, {cover_letter_artifact}
pub const CRITIQUE_TEMPLATE: &str = r#"Review the resume and cover letter drafts against the job.

CHECK:
1. The resume fits on one page and is not overstuffed.
2. Work Experience and Technical Projects are clearly separate sections.
3. How well the package matches the job, scored 0-100.
4. When the score is 85 or below, concrete revision instructions for the next draft.

JOB DESCRIPTION:
{job_description}

TARGET PERSONA:
{target_persona_json}

REQUIREMENT MAP:
{requirement_map_json}

RESUME DRAFT:
{resume_artifact}

COVER LETTER DRAFT:
{cover_letter_artifact}

Return a JSON object with this schema:
{
  "match_score": 0,
  "issues": [],
  "revision_instructions": ""
}"#;

pub const ANALYZE: RoleInstructions = RoleInstructions {
    system: ANALYZE_SYSTEM,
    template: ANALYZE_TEMPLATE,
};

pub const MAP: RoleInstructions = RoleInstructions {
    system: MAP_SYSTEM,
    template: MAP_TEMPLATE,
};

pub const RESUME: RoleInstructions = RoleInstructions {
    system: RESUME_SYSTEM,
    template: RESUME_TEMPLATE,
};

pub const COVER_LETTER: RoleInstructions = RoleInstructions {
    system: COVER_LETTER_SYSTEM,
    template: COVER_LETTER_TEMPLATE,
};

pub const CRITIQUE: RoleInstructions = RoleInstructions {
    system: CRITIQUE_SYSTEM,
    template: CRITIQUE_TEMPLATE,
};
