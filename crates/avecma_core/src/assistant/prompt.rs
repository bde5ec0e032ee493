//! System instructions and prompt text sent to the model.

use crate::model::chat::Therapist;
use crate::stats::dashboard::DashboardStats;
use crate::stats::ledger::format_money;

/// Persona used when the client picked no therapist.
pub const DEFAULT_COMPANION_NAME: &str = "Ma";

const DEFAULT_COMPANION_PERSONALITY: &str = "gentle, patient and encouraging; speaks like a \
trusted friend who has raised children and understands exhaustion without judgment";

/// Instruction for the performance analysis call.
pub const COACH_INSTRUCTION: &str = "You are a supportive wellness coach analyzing a user's \
performance data. Provide a brief, encouraging analysis (2-3 sentences max) based on their \
data. Be warm, specific, and actionable. Use emojis naturally. Focus on what they're doing well \
and offer one gentle suggestion.";

/// Builds the chat system instruction for `therapist`, or the default companion.
pub fn therapist_instruction(therapist: Option<&Therapist>) -> String {
    let (name, personality) = match therapist {
        Some(persona) if !persona.name.trim().is_empty() => {
            let personality = persona.personality.trim();
            (
                persona.name.trim(),
                if personality.is_empty() {
                    DEFAULT_COMPANION_PERSONALITY
                } else {
                    personality
                },
            )
        }
        _ => (DEFAULT_COMPANION_NAME, DEFAULT_COMPANION_PERSONALITY),
    };

    format!(
        "You are {name}, a supportive companion for parents in the Avec Ma wellness app. \
Your personality: {personality}. Listen first, validate feelings, and keep replies short \
(a few sentences) and practical. You are not a licensed clinician: never diagnose, and if the \
user mentions self-harm or danger, urge them to contact local emergency services or a crisis line."
    )
}

/// Builds the analysis prompt from dashboard statistics.
pub fn analysis_prompt(stats: &DashboardStats) -> String {
    let finance = &stats.finance;
    let paid = if finance.paid_bills > 0.0 {
        format!("{} paid", format_money(finance.paid_bills))
    } else {
        "none paid".to_string()
    };

    format!(
        "Analyze this user's performance data and provide a brief, encouraging insight:\n\
\n\
Task Completion: {rate}% ({completed} of {total} tasks completed)\n\
Today's Tasks: {today} remaining\n\
Upcoming Tasks: {upcoming} scheduled\n\
Today's Capacity: {capacity}% ({level})\n\
Financial Status: {income} income, {expenses} expenses, {bills} bills ({paid})\n\
Remaining Budget: {remaining}\n\
\n\
Provide a warm, brief analysis focusing on their strengths and one helpful suggestion.",
        rate = stats.completion_rate,
        completed = stats.completed_tasks,
        total = stats.total_tasks,
        today = stats.today_tasks,
        upcoming = stats.upcoming_tasks,
        capacity = stats.capacity,
        level = stats.capacity_level.as_str(),
        income = format_money(finance.income),
        expenses = format_money(finance.expenses),
        bills = format_money(finance.bills),
        paid = paid,
        remaining = format_money(finance.remaining),
    )
}

#[cfg(test)]
mod tests {
    use super::{analysis_prompt, therapist_instruction, DEFAULT_COMPANION_NAME};
    use crate::model::chat::Therapist;
    use crate::stats::capacity::CapacityLevel;
    use crate::stats::dashboard::DashboardStats;
    use crate::stats::ledger::LedgerSummary;

    #[test]
    fn missing_persona_falls_back_to_companion() {
        let instruction = therapist_instruction(None);
        assert!(instruction.starts_with(&format!("You are {DEFAULT_COMPANION_NAME},")));

        let blank = Therapist {
            id: "x".to_string(),
            name: "  ".to_string(),
            personality: String::new(),
        };
        assert_eq!(therapist_instruction(Some(&blank)), instruction);
    }

    #[test]
    fn persona_name_and_personality_are_used() {
        let persona = Therapist {
            id: "dr-lee".to_string(),
            name: "Dr. Lee".to_string(),
            personality: "calm and direct".to_string(),
        };
        let instruction = therapist_instruction(Some(&persona));
        assert!(instruction.starts_with("You are Dr. Lee,"));
        assert!(instruction.contains("calm and direct"));
    }

    #[test]
    fn analysis_prompt_formats_money_and_level() {
        let stats = DashboardStats {
            completed_tasks: 1,
            total_tasks: 4,
            completion_rate: 25,
            today_tasks: 2,
            upcoming_tasks: 1,
            capacity: 60,
            capacity_level: CapacityLevel::Medium,
            burnout_risk: 60,
            finance: LedgerSummary {
                income: 1000.0,
                expenses: 300.0,
                bills: 350.0,
                paid_bills: 200.0,
                remaining: 500.0,
            },
        };
        let prompt = analysis_prompt(&stats);
        assert!(prompt.contains("Task Completion: 25% (1 of 4 tasks completed)"));
        assert!(prompt.contains("Today's Capacity: 60% (MEDIUM)"));
        assert!(prompt.contains(
            "Financial Status: $1000.00 income, $300.00 expenses, $350.00 bills ($200.00 paid)"
        ));
        assert!(prompt.contains("Remaining Budget: $500.00"));
    }
}
