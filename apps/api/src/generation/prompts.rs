// Prompt templates for the generation tasks.
// Placeholders are `{name}`; fill them with `render`, never with chained `replace`
// calls, so user text containing `{...}` is inserted verbatim and never rescanned.

/// ATS analysis prompt. Replace: {resume_text}, {job_description}, {json_only}
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"You are CareerCatalyst AI - an expert ATS (Applicant Tracking System) analyst with 15 years experience in HR tech.

RESUME:
{resume_text}

JOB DESCRIPTION:
{job_description}

Analyze this resume against the job description and provide a detailed ATS optimization report in JSON format with the following structure:

{
  "score": <integer 0-100>,
  "breakdown": {
    "keywords": <integer 0-100>,
    "formatting": <integer 0-100>,
    "impact": <integer 0-100>,
    "brevity": <integer 0-100>
  },
  "keywords": {
    "missing": [<array of critical keywords missing from resume>],
    "overused": [<array of buzzwords to remove>],
    "suggested": [<array of suggested keyword integrations>]
  },
  "formatting": {
    "issues": [<array of ATS-unfriendly elements>],
    "suggestions": [<array of structural changes>]
  },
  "impactRewrites": [
    {
      "original": "<original bullet point>",
      "alternatives": [<exactly 3 better alternatives using metrics and action verbs>]
    }
  ],
  "fixes": [<array of top 3 immediate fixes>]
}

{json_only}"#;

/// Cover letter prompt. Replace: {job_description}, {company_name}, {hiring_manager},
/// {user_experience}, {tone}, {date}, {plain_text}
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = r#"You are a master copywriter specializing in career documents. Create a compelling, personalized cover letter.

INPUTS:
- Job Description: {job_description}
- Company Name: {company_name}
- Hiring Manager: {hiring_manager}
- User Experience/Achievements: {user_experience}
- Desired Tone: {tone}

Create a customized cover letter with these sections:
1. Attention-Grabbing Opening (connects passion to company mission)
2. Value Proposition Paragraph (3 key skills matching job requirements)
3. Quantified Achievement Showcase (using STAR method)
4. Company-Specific Research Integration
5. Confident Closing with call to action

REQUIREMENTS:
- Avoid clichés like "I'm writing to apply for..."
- Use power verbs and quantifiable results
- Keep paragraphs under 4 lines
- Professional formatting with date header
- {tone} tone throughout

Return the cover letter text, properly formatted with the date ({date}) at the top.
{plain_text}"#;

/// Interview turn prompt. Replace: {role}, {company_type}, {seniority}, {round},
/// {difficulty}, {conversation}, {last_answer}, {json_only}
pub const INTERVIEW_PROMPT_TEMPLATE: &str = r#"You are an interview coach who has conducted 5000+ interviews at FAANG companies. You are simulating a realistic interview.

INTERVIEW SETUP:
- Role: {role}
- Company Type: {company_type}
- Seniority: {seniority}
- Interview Round: {round}
- Difficulty: {difficulty}

CONVERSATION SO FAR:
{conversation}

CANDIDATE'S LAST ANSWER:
{last_answer}

TASKS:
1. Provide feedback on the candidate's last answer in JSON format:
{
  "strengths": [<2-3 specific things they did well>],
  "improvements": [<2-3 concrete suggestions>],
  "betterAnswer": "<model response showing how to improve>",
  "score": <integer 1-10>
}

2. Ask the next appropriate interview question based on the phase and flow.

Return a JSON object with this structure:
{
  "feedback": {<feedback object from above>},
  "message": "<your next question>"
}

{json_only}"#;

/// Single-pass placeholder substitution.
///
/// `{name}` is replaced when `name` is one of `vars`; any other brace text
/// (JSON examples in the template) is copied through unchanged.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let hit = after.find('}').and_then(|close| {
            let name = &after[..close];
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (close, *value))
        });

        match hit {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
