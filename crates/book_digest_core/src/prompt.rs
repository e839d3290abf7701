//! crates/book_digest_core/src/prompt.rs
//!
//! Pure prompt construction, one builder per content type. Builders never
//! talk to a provider; they are string templates plus injected randomness.
//! The random source exists purely for prompt diversity (it nudges the
//! upstream model away from repeating prior answers), not for security.

use std::fmt::Write;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::BookRef;

/// Descriptive framings for the kind of passage a quote prompt asks for.
pub const PASSAGE_TYPES: [&str; 10] = [
    "a thought-provoking philosophical passage",
    "a pivotal character development moment",
    "a beautifully descriptive scene",
    "an emotionally powerful dialogue",
    "a passage that reveals the book's central theme",
    "an intriguing plot turning point",
    "a memorable character interaction",
    "a passage with rich symbolism or metaphor",
    "a moment of internal conflict or revelation",
    "a striking opening or closing passage from a chapter",
];

/// Framings for how the model should angle its selection.
pub const ANALYSIS_ANGLES: [&str; 10] = [
    "focus on the literary techniques used",
    "examine the character psychology",
    "explore the cultural or historical context",
    "analyze the symbolism and deeper meaning",
    "discuss the emotional impact",
    "consider the philosophical implications",
    "highlight the unique writing style",
    "examine the social commentary",
    "discuss how it connects to the overall narrative",
    "analyze the use of language and imagery",
];

fn random_seed<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    rng.gen_range(1..=1_000_000)
}

fn book_context(book: &BookRef) -> String {
    match book.description.as_deref() {
        Some(description) if !description.is_empty() => {
            format!("Book context: {description}. ")
        }
        _ => String::new(),
    }
}

fn book_list(books: &[BookRef]) -> String {
    let mut list = String::new();
    for book in books {
        let _ = writeln!(list, "- '{}' by {}", book.title, book.author);
    }
    list
}

/// Prompt for an authentic passage plus a randomly drawn passage type and
/// analysis angle.
pub fn quote_prompt<R: Rng + ?Sized>(rng: &mut R, book: &BookRef) -> String {
    // The catalogs are non-empty, so `choose` cannot return None.
    let passage_type = PASSAGE_TYPES.choose(rng).copied().unwrap_or(PASSAGE_TYPES[0]);
    let analysis_angle = ANALYSIS_ANGLES.choose(rng).copied().unwrap_or(ANALYSIS_ANGLES[0]);
    let seed = random_seed(rng);

    let mut prompt = format!("Random seed: {seed}\n\n");
    let _ = write!(
        prompt,
        "I need an ACTUAL, REAL passage from the published book '{}' by {}. ",
        book.title, book.author
    );
    prompt.push_str(&book_context(book));
    let _ = write!(
        prompt,
        "Please find and extract {passage_type} and {analysis_angle}.\n\n"
    );

    prompt.push_str("CRITICAL REQUIREMENTS - NO EXCEPTIONS:\n");
    prompt.push_str("- You MUST provide an EXACT quote from the actual published book\n");
    prompt.push_str("- DO NOT create, paraphrase, or generate new content\n");
    prompt.push_str("- DO NOT make up quotes that sound like the author\n");
    prompt.push_str("- If you cannot recall the exact text, return: 'Unable to locate exact passage'\n");
    prompt.push_str("- Choose a DIFFERENT section of the book each time for variety\n");
    prompt.push_str("- Focus on passages that showcase different aspects of the author's writing\n\n");

    prompt.push_str(
        "Provide exactly one authentic passage (1 short paragraph maximum) with NO introductory text. ",
    );
    prompt.push_str(
        "Simply provide the EXACT passage content as it appears in the published book.\n\n",
    );

    let _ = write!(
        prompt,
        "If you cannot provide an exact quote, respond with: 'Unable to locate exact passage from {} by {}.'",
        book.title, book.author
    );

    prompt
}

/// Prompt for a short excerpt in the author's voice.
pub fn snippet_prompt<R: Rng + ?Sized>(rng: &mut R, book: &BookRef) -> String {
    let seed = random_seed(rng);

    let mut prompt = format!("Random seed: {seed}\n\n");
    let _ = write!(
        prompt,
        "Extract an ACTUAL, REAL excerpt from the published book '{}' by {}. ",
        book.title, book.author
    );
    prompt.push_str(&book_context(book));

    prompt.push_str("CRITICAL REQUIREMENTS - NO EXCEPTIONS:\n");
    prompt.push_str("- You MUST provide an EXACT excerpt from the actual published book\n");
    prompt.push_str("- DO NOT create, paraphrase, or generate new content\n");
    prompt.push_str("- DO NOT make up text that sounds like the author\n");
    prompt.push_str("- If you cannot recall exact text, return: 'Unable to locate exact excerpt'\n");
    prompt.push_str("- Choose a different, random section each time to avoid repetition\n");
    prompt.push_str("- Keep it concise (2-3 sentences, maximum 1 short paragraph)\n");
    prompt.push_str("- Select passages that showcase the author's unique voice and style\n");
    prompt.push_str("- Provide ONLY the excerpt content, no introductory text\n\n");

    let _ = write!(
        prompt,
        "If you cannot provide an exact excerpt, respond with: 'Unable to locate exact excerpt from {} by {}.'",
        book.title, book.author
    );

    prompt
}

/// Prompt for a quote worth pausing over.
pub fn quote_to_ponder_prompt<R: Rng + ?Sized>(rng: &mut R, book: &BookRef) -> String {
    let seed = random_seed(rng);

    let mut prompt = format!("Random seed: {seed}\n\n");
    let _ = write!(
        prompt,
        "Extract an ACTUAL, REAL quote from the published book '{}' by {}. ",
        book.title, book.author
    );
    prompt.push_str(&book_context(book));

    prompt.push_str("CRITICAL REQUIREMENTS - NO EXCEPTIONS:\n");
    prompt.push_str("- You MUST provide an EXACT quote from the actual published book\n");
    prompt.push_str("- DO NOT create, paraphrase, or generate new content\n");
    prompt.push_str("- DO NOT make up quotes that sound like the author\n");
    prompt.push_str("- If you cannot recall exact text, return: 'Unable to locate exact quote'\n");
    prompt.push_str("- Choose a different quote each time to ensure variety\n");
    prompt.push_str("- Select quotes that are philosophically rich or emotionally resonant\n");
    prompt.push_str("- Focus on quotes that make readers pause and think\n");
    prompt.push_str("- Provide ONLY the quote text, no context or explanation\n\n");

    let _ = write!(
        prompt,
        "If you cannot provide an exact quote, respond with: 'Unable to locate exact quote from {} by {}.'",
        book.title, book.author
    );

    prompt
}

/// Prompt for a thematic or stylistic connection across 2+ books.
pub fn connection_prompt(books: &[BookRef]) -> String {
    let mut prompt = String::from(
        "Generate an insightful connection between these books from the user's reading list:\n",
    );
    prompt.push_str(&book_list(books));
    prompt.push_str("\nRequirements:\n");
    prompt.push_str("- Find a meaningful thematic, philosophical, or stylistic connection\n");
    prompt.push_str("- Make it thought-provoking and intellectually engaging\n");
    prompt.push_str("- Keep it concise but substantive (2-3 sentences)\n");
    prompt.push_str("- Focus on how the books complement or contrast with each other\n");
    prompt.push_str("- Provide only the connection insight, no introductory text\n");

    prompt
}

/// Prompt for an actionable reflection grounded in the user's books.
pub fn reflection_prompt(books: &[BookRef]) -> String {
    let mut prompt = String::from("Based on these books from the user's reading list:\n");
    prompt.push_str(&book_list(books));
    prompt.push_str("\nGenerate a thoughtful reflection question or insight for today. Requirements:\n");
    prompt.push_str("- Create a question or prompt that encourages deep thinking\n");
    prompt.push_str("- Draw from themes, ideas, or lessons found in these books\n");
    prompt.push_str("- Make it personally applicable and actionable\n");
    prompt.push_str("- Keep it concise but meaningful (1-2 sentences)\n");
    prompt.push_str("- Focus on personal growth, wisdom, or practical application\n");
    prompt.push_str("- Provide only the reflection content, no introductory text\n");

    prompt
}

/// Prompt for autocomplete suggestions. The target JSON schema is embedded
/// in the prompt text itself because the raw output is parsed downstream.
pub fn book_info_prompt(partial_title: &str) -> String {
    format!(
        "Based on the partial book title: '{partial_title}', please provide up to 3 book suggestions that match this title. For each book, provide ONLY the following information in this exact JSON format:

{{
  \"suggestions\": [
    {{
      \"title\": \"Full book title\",
      \"author\": \"Author name\",
      \"publication_year\": year,
      \"genre\": \"Genre\",
      \"description\": \"Brief description (2-3 sentences)\"
    }}
  ]
}}

Only include well-known, published books. Provide accurate information only."
    )
}
