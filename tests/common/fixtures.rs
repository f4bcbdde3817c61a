//! Canned unit sources

/// One TYPE and one CALLABLE, both honouring the greeting contract
pub const GREETER: &str = r#"
export const Greeter = blueprint(#{
    greet: |s| `GREETING:${s}:${unit_name()}`
});

fn greet(s) {
    `GREETING:${s}:${unit_name()}`
}
"#;

/// Unit-level constant read from a named function and from a blueprint
/// method bound by name
pub const CONSTANT_GREETER: &str = r#"
const PREFIX = "GREETING";

fn make(s) {
    `${global::PREFIX}:${s}:${unit_name()}`
}

export const Greeter = blueprint(#{ greet: Fn("make") });

fn greet(s) {
    `${global::PREFIX}:${s}:${unit_name()}`
}
"#;

/// A single CALLABLE honouring the greeting contract
pub const WELCOME: &str = r#"
fn greet(s) {
    "GREETING:" + s + ":" + unit_name()
}
"#;

/// Abstract declarations only; contributes nothing to the registry
pub const ABSTRACT_ONLY: &str = r#"
export const Base = abstract_base();
export const Shape = Base.extend(#{ greet: required() });
export const later = placeholder();
"#;

/// A concrete subtype of an abstract blueprint
pub const DERIVED: &str = r#"
export const Base = abstract_base();
export const Speaker = Base.extend(#{ greet: required() });
export const Polite = Speaker.extend(#{
    greet: |s| "GREETING:" + s + ":" + unit_name()
});
"#;

/// Does not compile
pub const SYNTAX_ERROR: &str = "fn greet(s) {";

/// Compiles but fails while initialising
pub const THROWS_ON_LOAD: &str = r#"throw "refusing to load";"#;

/// Answers with a fixed string instead of the canonical greeting
pub const WRONG_ANSWER: &str = r#"fn greet(s) { "hello there" }"#;
