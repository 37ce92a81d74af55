// Prompt text for augmentation. The model only rewords; it never decides.

use crate::engine::MessageContext;

pub const AUGMENT_SYSTEM: &str = "You are a warm, concise career coach. \
    Rewrite the coach question you are given so it sounds natural and encouraging. \
    Keep its intent exactly: do not add new questions, do not change the topic, \
    and do not invent facts about the user. \
    Respond with the rewritten question only, in one or two sentences, without quotes.";

/// Builds the rewording prompt for one turn.
pub fn build_augment_prompt(user_turn: &str, context: &MessageContext) -> String {
    let missing = if context.missing_elements.is_empty() {
        "none".to_string()
    } else {
        context
            .missing_elements
            .iter()
            .map(|e| e.label())
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        "Conversation phase: {phase} ({progress}% complete)\n\
         Follow-up strategy: {strategy}\n\
         Still missing: {missing}\n\n\
         The user just said:\n\"\"\"\n{user_turn}\n\"\"\"\n\n\
         Coach question to rewrite:\n{question}",
        phase = context.phase,
        progress = context.progress_percentage,
        strategy = context.follow_up_strategy,
        question = context.next_question,
    )
}
