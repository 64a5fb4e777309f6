/// Routine text with `sections` numbered steps, each carrying every markup
/// style and a line long enough to wrap on an A4 page.
pub fn generate_routine(sections: usize) -> String {
    let mut out = String::from("Here is a routine tailored to your *oily* skin.\n\n");
    for idx in 0..sections {
        out.push_str(&format!("{}. **Step {}**\n", idx + 1, idx + 1));
        out.push_str("Cleanse with a *gentle*, fragrance-free gel and rinse well.\n");
        out.push_str(
            "Apply a _lightweight_ moisturizer while skin is damp, then finish with \
             **broad spectrum SPF 30** or higher every single morning.\n\n",
        );
    }
    out.push_str("**Note:** patch test new products first.\n");
    out
}
