use std::fmt::Write;

use crate::detector::{AppFeatures, AppName, Verdict};

/// Advisory length limit for the `reason` field.
pub const REASON_SOFT_LIMIT: usize = 300;

/// Builds the cross-verification prompt for one submission.
///
/// The output depends only on the arguments. Field values are written verbatim:
/// the rating keeps its decimal point (`3.0`, not `3`) and editor choice is
/// the 0/1 flag the model sees.
pub fn build_prompt(name: &AppName, features: &AppFeatures, verdict: Verdict) -> String {
    let mut prompt = String::with_capacity(1024);

    // Writing into a String cannot fail.
    let _ = writeln!(prompt, "Given the following app details:");
    let _ = writeln!(prompt, "- App Name: {}", name);
    let _ = writeln!(prompt, "- Rating: {:?}", features.rating());
    let _ = writeln!(prompt, "- Rating Count: {}", features.rating_count());
    let _ = writeln!(prompt, "- Installs: {}", features.installs());
    let _ = writeln!(prompt, "- Maximum Installs: {}", features.max_installs());
    let _ = writeln!(prompt, "- Editor Choice: {}", features.editor_choice_flag());
    prompt.push('\n');

    let _ = write!(
        prompt,
        "The preliminary classification is '{verdict}'. \
         First, analyze the App Name '{name}' for any suspicious patterns or known fraud indicators. \
         Then provide a concise explanation (up to {limit} characters) for why this app is classified as \
         '{verdict}', taking into account both the app name analysis and the other metrics. \
         Return the answer strictly in the following JSON format with no markdown formatting or code blocks:\n",
        limit = REASON_SOFT_LIMIT,
    );
    let _ = write!(
        prompt,
        "{{ \"type\": \"fraud\"|\"genuine\"|\"suspected\", \
         \"app_name_analysis\": \"Brief analysis of app name (is it suspicious?)\", \
         \"reason\": \"Concise explanation including app name considerations ({} char max)\" }}",
        REASON_SOFT_LIMIT,
    );

    prompt
}
