//! Study Buddy - academic and career mentor
//!
//! Keeps a lightweight student profile extracted from free text (branch,
//! semester, year) and routes each question through one of five feature
//! prompts picked by keyword match. Extraction is best-effort; a miss just
//! means the prompt carries less context.

use eyre::Result;
use lazy_regex::regex_captures;
use once_cell::sync::Lazy;

use super::convo::{LoopCtx, Persona, Transition, VerbOutcome};
use crate::gemini::{Chat, Generator};
use crate::ui;

const SYSTEM_PROMPT: &str = r#"You are a senior college mentor.
Your job is to guide students clearly and concisely.
Do NOT write essays.
Do NOT overexplain.
Structure every answer using headings and bullet points.
Be practical, not theoretical.

All Study Buddy responses MUST follow these global rules:
🔒 Global Output Rules
❌ No essays
❌ No paragraphs longer than 3 lines
❌ No generic motivational talk
✅ Max response length: 250–300 words
✅ Use headings + bullet points
✅ Every answer must feel like actionable guidance

📐 RESPONSE FORMAT (STRICT)
Every response must follow THIS TEMPLATE ONLY:

🎯 Summary (1–2 lines)

📚 Key Points
- Bullet 1
- Bullet 2
- Bullet 3

🛠️ What You Should Do Next
1. Step one
2. Step two
3. Step three

⚠️ Common Mistakes (optional, max 2 bullets)

❌ You must NOT invent new sections
❌ You must NOT add explanations outside this structure
"#;

/// Feature a question is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    SubjectGuide,
    CareerPath,
    InternshipFinder,
    InterviewPrep,
    GeneralChat,
}

// Starting defaults, not a correctness contract; misrouted questions still
// land in a reasonable prompt
const SUBJECT_KEYWORDS: &[&str] = &[
    "subject", "syllabus", "semester", "sem", "study", "course", "curriculum", "book", "resource", "learn", "topic",
];
const CAREER_KEYWORDS: &[&str] = &[
    "career",
    "job",
    "future",
    "role",
    "position",
    "path",
    "higher studies",
    "mba",
    "mtech",
    "masters",
    "phd",
    "startup",
    "freelance",
    "what can i do",
    "after graduation",
    "scope",
];
const INTERNSHIP_KEYWORDS: &[&str] = &[
    "internship",
    "intern",
    "opportunity",
    "apply",
    "platform",
    "experience",
    "where to apply",
    "hiring",
    "openings",
];
const INTERVIEW_KEYWORDS: &[&str] = &[
    "interview",
    "prepare",
    "question",
    "hr",
    "technical",
    "placement",
    "selection",
    "hiring process",
    "crack",
];

/// Branch labels, probed longest-key-first so multi-word names win over
/// two-letter abbreviations that hide inside ordinary words
static BRANCHES: Lazy<Vec<(&'static str, &'static str)>> = Lazy::new(|| {
    let mut table = BRANCH_KEYS.to_vec();
    table.sort_by_key(|(key, _)| std::cmp::Reverse(key.len()));
    table
});

const BRANCH_KEYS: &[(&str, &str)] = &[
    ("cse", "Computer Science Engineering (CSE)"),
    ("computer science", "Computer Science Engineering (CSE)"),
    ("cs", "Computer Science Engineering (CSE)"),
    ("information technology", "Information Technology (IT)"),
    ("it", "Information Technology (IT)"),
    ("ece", "Electronics & Communication Engineering (ECE)"),
    ("electronics", "Electronics & Communication Engineering (ECE)"),
    ("eee", "Electrical & Electronics Engineering (EEE)"),
    ("electrical", "Electrical & Electronics Engineering (EEE)"),
    ("mechanical", "Mechanical Engineering (ME)"),
    ("me", "Mechanical Engineering (ME)"),
    ("civil", "Civil Engineering"),
    ("ce", "Civil Engineering"),
    ("data science", "Data Science"),
    ("ds", "Data Science"),
    ("aiml", "AI & Machine Learning"),
    ("machine learning", "AI & Machine Learning"),
    ("ai", "Artificial Intelligence"),
    ("biotech", "Biotechnology"),
    ("chemical", "Chemical Engineering"),
];

pub fn detect_feature(input: &str) -> Feature {
    let lower = input.to_lowercase();
    let hit = |keywords: &[&str]| keywords.iter().any(|kw| lower.contains(kw));

    if hit(INTERVIEW_KEYWORDS) {
        Feature::InterviewPrep
    } else if hit(INTERNSHIP_KEYWORDS) {
        Feature::InternshipFinder
    } else if hit(CAREER_KEYWORDS) {
        Feature::CareerPath
    } else if hit(SUBJECT_KEYWORDS) {
        Feature::SubjectGuide
    } else {
        Feature::GeneralChat
    }
}

fn feature_instructions(feature: Feature) -> &'static str {
    match feature {
        Feature::SubjectGuide => {
            "\nTASK: Provide subject/syllabus guidance.\n🧩 FEATURE-SPECIFIC CONTROLS:\n- Only subject names\n- 1-line description per subject\n- Max 6 subjects\n"
        }
        Feature::CareerPath => {
            "\nTASK: Provide career guidance.\n🧩 FEATURE-SPECIFIC CONTROLS:\n- Max 4 career roles\n- Each role: Skills (comma-separated), One-line description\n"
        }
        Feature::InternshipFinder => {
            "\nTASK: Guide on internships and opportunities.\n🧩 FEATURE-SPECIFIC CONTROLS:\n- Platform names ONLY (no links)\n- Skills list\n- 1-line eligibility hint\n"
        }
        Feature::InterviewPrep => {
            "\nTASK: Help with interview preparation.\n🧩 FEATURE-SPECIFIC CONTROLS:\n- Max 5 questions\n- Categorized: HR, Technical\n- No long answers, only what interviewer expects\n"
        }
        Feature::GeneralChat => {
            "\nTASK: General academic/career guidance.\n- Be helpful and conversational\n- Keep it structured using the standard template\n"
        }
    }
}

/// Student profile inferred from the conversation so far
#[derive(Debug, Default)]
pub struct StudentContext {
    pub branch: Option<String>,
    pub semester: Option<u32>,
    pub year: Option<u32>,
    pub target_role: Option<String>,
    pub experience_level: Option<String>,
}

impl StudentContext {
    /// Pull branch/semester/year hints out of free text
    pub fn absorb(&mut self, input: &str) {
        let lower = input.to_lowercase();
        let words: Vec<&str> = lower.split(|c: char| !c.is_alphanumeric()).collect();

        for (key, label) in BRANCHES.iter() {
            // Short abbreviations must stand alone; "me" hides inside
            // "semester" and "ce" inside "science"
            let matched = if key.len() <= 3 {
                words.contains(key)
            } else {
                lower.contains(key)
            };
            if matched {
                self.branch = Some(label.to_string());
                break;
            }
        }

        if let Some((_, digits)) = regex_captures!(r"(\d+)(?:st|nd|rd|th)?\s*(?:sem|semester)", &lower) {
            self.semester = digits.parse().ok();
        }

        if let Some((_, digits)) = regex_captures!(r"(\d+)(?:st|nd|rd|th)?\s*year", &lower) {
            self.year = digits.parse().ok();
            if self.semester.is_none() {
                // First semester of the stated year
                self.semester = self.year.map(|y| (y.saturating_sub(1)) * 2 + 1);
            }
        }
    }

    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(branch) = &self.branch {
            parts.push(format!("Branch/Department: {}", branch));
        }
        if let Some(semester) = self.semester {
            parts.push(format!("Semester: {}", semester));
        }
        if let Some(year) = self.year {
            parts.push(format!("Year: {}", year));
        }
        if let Some(role) = &self.target_role {
            parts.push(format!("Target Role: {}", role));
        }
        if let Some(level) = &self.experience_level {
            parts.push(format!("Experience Level: {}", level));
        }
        if parts.is_empty() {
            "No context set yet.".to_string()
        } else {
            parts.join("\n")
        }
    }

    pub fn status(&self) -> String {
        format!(
            "Branch: {}\nSemester: {}\nTarget Role: {}",
            self.branch.as_deref().unwrap_or("Not set"),
            self.semester.map(|s| s.to_string()).unwrap_or_else(|| "Not set".into()),
            self.target_role.as_deref().unwrap_or("Not set"),
        )
    }
}

pub struct StudyBuddy<'a> {
    generator: &'a dyn Generator,
    chat: Chat<'a>,
    context: StudentContext,
}

impl<'a> StudyBuddy<'a> {
    pub fn new(generator: &'a dyn Generator) -> Self {
        Self {
            generator,
            chat: Chat::new(generator),
            context: StudentContext::default(),
        }
    }

    fn build_prompt(&self, input: &str, feature: Feature) -> String {
        format!(
            "{}\n\nSTUDENT CONTEXT:\n{}\n\nSTUDENT'S QUESTION/REQUEST:\n{}\n{}",
            SYSTEM_PROMPT,
            self.context.summary(),
            input,
            feature_instructions(feature)
        )
    }
}

impl Persona for StudyBuddy<'_> {
    fn module(&self) -> &'static str {
        "Study Buddy"
    }

    fn tagline(&self) -> &'static str {
        "Your AI Senior Mentor • Subject Guide • Career Path • Internships • Interview Prep"
    }

    fn speaker(&self) -> String {
        "Senior Mentor".to_string()
    }

    fn keywords(&self) -> &'static [(&'static str, Transition)] {
        &[("status", Transition::Verb("status")), ("reset", Transition::Verb("reset"))]
    }

    fn hint(&self) -> &'static str {
        "(Type 'exit' to go back, 'status' for your profile, 'reset' to start over)"
    }

    fn default_title(&self) -> String {
        "Study Session".to_string()
    }

    fn on_start(&mut self, _ctx: &mut LoopCtx) -> Result<bool> {
        ui::print_bot(
            "Senior Mentor",
            "Hey! I'm your Study Buddy. Think of me as that helpful senior who's been through it all.\n\nTell me: what's your branch and semester?",
        );
        Ok(true)
    }

    fn respond(&mut self, request: &str) -> Result<String> {
        self.context.absorb(request);
        let feature = detect_feature(request);
        log::debug!("Study Buddy routed input to {:?}", feature);
        let prompt = self.build_prompt(request, feature);
        let reply = self.chat.send(&prompt)?;
        Ok(squeeze_blank_lines(&reply))
    }

    fn on_verb(&mut self, verb: &str, _ctx: &mut LoopCtx) -> Result<VerbOutcome> {
        match verb {
            "status" => ui::print_bot("Profile Status", &self.context.status()),
            "reset" => {
                self.context = StudentContext::default();
                self.chat = Chat::new(self.generator);
                ui::print_success("Session reset! Let's start fresh.");
            }
            _ => {}
        }
        Ok(VerbOutcome::Stay)
    }
}

/// Collapse runs of 3+ newlines the model sometimes emits
fn squeeze_blank_lines(text: &str) -> String {
    lazy_regex::regex!(r"\n{3,}").replace_all(text.trim(), "\n\n").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_branch_and_semester() {
        let mut ctx = StudentContext::default();
        ctx.absorb("I am in 3rd semester CSE");
        assert_eq!(ctx.branch.as_deref(), Some("Computer Science Engineering (CSE)"));
        assert_eq!(ctx.semester, Some(3));
    }

    #[test]
    fn test_year_implies_first_semester_of_year() {
        let mut ctx = StudentContext::default();
        ctx.absorb("I'm a 2nd year mechanical student");
        assert_eq!(ctx.year, Some(2));
        assert_eq!(ctx.semester, Some(3));
        assert_eq!(ctx.branch.as_deref(), Some("Mechanical Engineering (ME)"));
    }

    #[test]
    fn test_explicit_semester_wins_over_year_inference() {
        let mut ctx = StudentContext::default();
        ctx.absorb("4th sem, 2nd year, ECE");
        assert_eq!(ctx.semester, Some(4));
        assert_eq!(ctx.year, Some(2));
    }

    #[test]
    fn test_context_survives_across_turns() {
        let mut ctx = StudentContext::default();
        ctx.absorb("I study data science");
        ctx.absorb("now in 5th semester");
        assert_eq!(ctx.branch.as_deref(), Some("Data Science"));
        assert_eq!(ctx.semester, Some(5));
    }

    #[test]
    fn test_longer_branch_key_beats_embedded_abbreviation() {
        // "science" contains "ce"; the multi-word key must win
        let mut ctx = StudentContext::default();
        ctx.absorb("thinking about machine learning");
        assert_eq!(ctx.branch.as_deref(), Some("AI & Machine Learning"));
    }

    #[test]
    fn test_bare_semester_mention_sets_no_branch() {
        let mut ctx = StudentContext::default();
        ctx.absorb("now in 5th semester");
        assert!(ctx.branch.is_none());
    }

    #[test]
    fn test_feature_detection_priorities() {
        assert_eq!(detect_feature("how do I crack the HR interview"), Feature::InterviewPrep);
        assert_eq!(detect_feature("where to apply for an internship"), Feature::InternshipFinder);
        assert_eq!(detect_feature("what career scope after graduation"), Feature::CareerPath);
        assert_eq!(detect_feature("which books for this syllabus"), Feature::SubjectGuide);
        assert_eq!(detect_feature("hello there"), Feature::GeneralChat);
    }

    #[test]
    fn test_interview_keyword_outranks_career() {
        // "interview" and "job" both present; interview wins
        assert_eq!(detect_feature("interview tips for my first job"), Feature::InterviewPrep);
    }

    #[test]
    fn test_status_with_nothing_set() {
        let ctx = StudentContext::default();
        assert!(ctx.status().contains("Branch: Not set"));
        assert_eq!(ctx.summary(), "No context set yet.");
    }

    #[test]
    fn test_squeeze_blank_lines() {
        assert_eq!(squeeze_blank_lines("a\n\n\n\nb"), "a\n\nb");
        assert_eq!(squeeze_blank_lines("  a\nb  "), "a\nb");
    }
}
