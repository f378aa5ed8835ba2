use std::error::Error;

/// Prints `err` and its chain of causes to stderr.
pub fn report(err: &dyn Error) {
    eprintln!("\x1b[31mError\x1b[0m: {}", chain(err));
}

/// Renders `err` and its causes on one line, outermost first.
pub fn chain(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_message = cause.to_string();
        // io and walkdir errors often repeat their cause in their own message
        if !message.contains(&cause_message) {
            message.push_str(": ");
            message.push_str(&cause_message);
        }
        source = cause.source();
    }
    message
}
