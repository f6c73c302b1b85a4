use std::sync::OnceLock;

use regex::Regex;

use crate::source::{JavaMember, JavaSource, TypeKind};
use crate::{JavaSourceParser, SyntaxError};

/// Shipped [`JavaSourceParser`]: a comment-stripping scan that extracts the
/// package, the first top-level type declaration, and its direct members.
///
/// The scanner is lenient: statements it cannot classify are skipped, nested
/// types are ignored, and only brace balance and the presence of a type
/// declaration are hard requirements.
#[derive(Clone, Copy, Debug, Default)]
pub struct SourceScanner;

impl SourceScanner {
    pub fn new() -> Self {
        Self
    }
}

impl JavaSourceParser for SourceScanner {
    fn parse(&self, source: &str) -> Result<JavaSource, SyntaxError> {
        let text = strip_noise(source);
        let package = find_package(&text);
        let decl = find_type_decl(&text).ok_or(SyntaxError::NoTypeDeclaration)?;
        let body = extract_body(&text[decl.brace..])?;

        let mut members = Vec::new();
        if decl.kind == TypeKind::Record {
            members.extend(record_components(&text[decl.header_end..decl.brace]));
        }
        scan_members(decl.kind, &decl.name, body, &mut members)?;

        Ok(JavaSource {
            package,
            name: decl.name,
            kind: decl.kind,
            members,
        })
    }
}

struct TypeDecl {
    kind: TypeKind,
    name: String,
    /// Offset just past the type name.
    header_end: usize,
    /// Offset of the opening brace of the type body.
    brace: usize,
}

/// Replace comments and string/char literals with spaces so the scan below
/// never matches inside them. Newlines are preserved.
fn strip_noise(source: &str) -> String {
    enum State {
        Code,
        Line,
        Block,
        Str,
        Chr,
    }

    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    let mut state = State::Code;

    while let Some(c) = chars.next() {
        match state {
            State::Code => match c {
                '/' => match chars.peek() {
                    Some('/') => {
                        chars.next();
                        out.push_str("  ");
                        state = State::Line;
                    }
                    Some('*') => {
                        chars.next();
                        out.push_str("  ");
                        state = State::Block;
                    }
                    _ => out.push('/'),
                },
                '"' => {
                    out.push(' ');
                    state = State::Str;
                }
                '\'' => {
                    out.push(' ');
                    state = State::Chr;
                }
                c => out.push(c),
            },
            State::Line => {
                if c == '\n' {
                    out.push('\n');
                    state = State::Code;
                } else {
                    out.push(' ');
                }
            }
            State::Block => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    out.push_str("  ");
                    state = State::Code;
                } else if c == '\n' {
                    out.push('\n');
                } else {
                    out.push(' ');
                }
            }
            State::Str => {
                if c == '\\' {
                    chars.next();
                    out.push_str("  ");
                } else if c == '"' {
                    out.push(' ');
                    state = State::Code;
                } else if c == '\n' {
                    out.push('\n');
                } else {
                    out.push(' ');
                }
            }
            State::Chr => {
                if c == '\\' {
                    chars.next();
                    out.push_str("  ");
                } else if c == '\'' {
                    out.push(' ');
                    state = State::Code;
                } else {
                    out.push(' ');
                }
            }
        }
    }
    out
}

fn find_package(text: &str) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"(?m)^\s*package\s+([A-Za-z_$][\w$]*(?:\.[A-Za-z_$][\w$]*)*)\s*;")
            .expect("valid regex")
    });
    re.captures(text).map(|caps| caps[1].to_string())
}

fn find_type_decl(text: &str) -> Option<TypeDecl> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"(@\s*interface|\bclass\b|\binterface\b|\benum\b|\brecord\b)\s+([A-Za-z_$][\w$]*)")
            .expect("valid regex")
    });

    let caps = re.captures(text)?;
    let keyword = caps.get(1)?.as_str();
    let kind = if keyword.starts_with('@') {
        TypeKind::Annotation
    } else {
        match keyword {
            "class" => TypeKind::Class,
            "interface" => TypeKind::Interface,
            "enum" => TypeKind::Enum,
            "record" => TypeKind::Record,
            _ => return None,
        }
    };
    let whole = caps.get(0)?;
    let brace = text[whole.end()..].find('{')? + whole.end();
    Some(TypeDecl {
        kind,
        name: caps[2].to_string(),
        header_end: whole.end(),
        brace,
    })
}

/// `text` starts at the type's opening brace; returns the slice between it
/// and its matching close brace.
fn extract_body(text: &str) -> Result<&str, SyntaxError> {
    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                if depth == 0 {
                    return Err(SyntaxError::UnbalancedBraces);
                }
                depth -= 1;
                if depth == 0 {
                    return Ok(&text[1..i]);
                }
            }
            _ => {}
        }
    }
    Err(SyntaxError::UnbalancedBraces)
}

fn scan_members(
    kind: TypeKind,
    type_name: &str,
    body: &str,
    members: &mut Vec<JavaMember>,
) -> Result<(), SyntaxError> {
    let mut depth = 0usize;
    let mut buf = String::new();
    let mut saw_first_statement = false;

    for c in body.chars() {
        match c {
            '{' => {
                // A brace after `=` starts a field initializer (lambda,
                // anonymous class, array literal); keep buffering and pick
                // the field up at its terminating `;`.
                if depth == 0 && !contains_top_level_eq(&buf) {
                    if let Some(member) = method_from_header(&buf, type_name) {
                        members.push(member);
                    }
                    buf.clear();
                    saw_first_statement = true;
                }
                depth += 1;
            }
            '}' => {
                if depth == 0 {
                    return Err(SyntaxError::UnbalancedBraces);
                }
                depth -= 1;
            }
            ';' => {
                if depth == 0 {
                    classify_statement(kind, type_name, &buf, !saw_first_statement, members);
                    buf.clear();
                    saw_first_statement = true;
                }
            }
            c => {
                if depth == 0 {
                    buf.push(c);
                }
            }
        }
    }
    if depth != 0 {
        return Err(SyntaxError::UnbalancedBraces);
    }
    if !buf.trim().is_empty() {
        classify_statement(kind, type_name, &buf, !saw_first_statement, members);
    }
    Ok(())
}

fn classify_statement(
    kind: TypeKind,
    type_name: &str,
    statement: &str,
    first: bool,
    members: &mut Vec<JavaMember>,
) {
    let statement = statement.trim();
    if statement.is_empty() {
        return;
    }

    if kind == TypeKind::Enum && first {
        if let Some(constants) = enum_constants(statement) {
            members.extend(constants);
            return;
        }
    }

    // Cut any initializer off; the declaration is everything before `=`.
    let head = match top_level_eq_position(statement) {
        Some(pos) => statement[..pos].trim(),
        None => statement,
    };

    if head.contains('(') {
        // Abstract/interface/annotation-element method.
        if let Some(member) = method_from_header(head, type_name) {
            members.push(member);
        }
        return;
    }

    members.extend(fields_from_declaration(head));
}

/// Parses one or more field declarators (`int a`, `int a, b`) from the text
/// before any initializer.
fn fields_from_declaration(head: &str) -> Vec<JavaMember> {
    let mut out = Vec::new();
    let parts = split_top_level(head, ',');
    let Some(first) = parts.first() else {
        return out;
    };

    let normalized = strip_generic_spaces(first);
    let tokens: Vec<&str> = normalized
        .split_whitespace()
        .filter(|t| !is_modifier(t) && !t.starts_with('@'))
        .collect();
    if tokens.len() < 2 {
        return out;
    }
    let (name, array_suffix) = split_array_suffix(tokens[tokens.len() - 1]);
    if !is_identifier(name) {
        return out;
    }
    let mut type_name = tokens[..tokens.len() - 1].join(" ");
    type_name.push_str(array_suffix);
    if !looks_like_type(&type_name) {
        return out;
    }

    out.push(JavaMember::Field {
        name: name.to_string(),
        type_name: type_name.clone(),
    });

    // Remaining declarators share the first one's type.
    for part in &parts[1..] {
        let (name, _) = split_array_suffix(part.trim());
        if is_identifier(name) {
            out.push(JavaMember::Field {
                name: name.to_string(),
                type_name: type_name.clone(),
            });
        }
    }
    out
}

/// Parses a method or constructor from the text before its body (or before
/// the `;` for body-less methods). Nested type headers and initializer
/// blocks yield `None`.
fn method_from_header(header: &str, type_name: &str) -> Option<JavaMember> {
    let header = header.trim();
    if header.is_empty() {
        return None;
    }

    static NESTED_RE: OnceLock<Regex> = OnceLock::new();
    let nested = NESTED_RE.get_or_init(|| {
        Regex::new(r"(@\s*interface|\bclass\b|\binterface\b|\benum\b|\brecord\b)\s+[A-Za-z_$]")
            .expect("valid regex")
    });
    if nested.is_match(header) {
        return None;
    }

    let header = match header.rfind(" throws ") {
        Some(pos) => header[..pos].trim_end(),
        None => header,
    };

    static METHOD_RE: OnceLock<Regex> = OnceLock::new();
    let re = METHOD_RE.get_or_init(|| {
        Regex::new(r"([A-Za-z_$][\w$]*)\s*\(([^()]*)\)\s*$").expect("valid regex")
    });
    let caps = re.captures(header)?;
    let name_match = caps.get(1)?;
    let name = name_match.as_str().to_string();
    let parameters = parameter_types(caps.get(2).map_or("", |m| m.as_str()));

    let leading = strip_generic_spaces(header[..name_match.start()].trim());
    let return_type = leading
        .split_whitespace()
        .filter(|t| !is_modifier(t) && !t.starts_with('@') && !t.starts_with('<'))
        .next_back()
        .map(str::to_owned);

    match return_type {
        Some(ret) if looks_like_type(&ret) => Some(JavaMember::Method {
            name,
            parameters,
            return_type: Some(ret),
        }),
        // No return type: a constructor of this type, otherwise noise.
        _ if name == type_name => Some(JavaMember::Method {
            name,
            parameters,
            return_type: None,
        }),
        _ => None,
    }
}

fn parameter_types(params: &str) -> Vec<String> {
    split_top_level(params, ',')
        .into_iter()
        .filter_map(|param| {
            let normalized = strip_generic_spaces(param.trim());
            let tokens: Vec<&str> = normalized
                .split_whitespace()
                .filter(|t| !is_modifier(t) && !t.starts_with('@'))
                .collect();
            if tokens.len() < 2 {
                return None;
            }
            Some(tokens[..tokens.len() - 1].join(" "))
        })
        .collect()
}

fn record_components(header: &str) -> Vec<JavaMember> {
    let Some(open) = header.find('(') else {
        return Vec::new();
    };
    let Some(close) = header.rfind(')') else {
        return Vec::new();
    };
    if close <= open {
        return Vec::new();
    }
    split_top_level(&header[open + 1..close], ',')
        .into_iter()
        .filter_map(|component| {
            let normalized = strip_generic_spaces(component.trim());
            let tokens: Vec<&str> = normalized
                .split_whitespace()
                .filter(|t| !t.starts_with('@'))
                .collect();
            if tokens.len() < 2 {
                return None;
            }
            let name = tokens[tokens.len() - 1];
            if !is_identifier(name) {
                return None;
            }
            Some(JavaMember::Field {
                name: name.to_string(),
                type_name: tokens[..tokens.len() - 1].join(" "),
            })
        })
        .collect()
}

/// The first statement of an enum body, if it parses as a constant list.
fn enum_constants(statement: &str) -> Option<Vec<JavaMember>> {
    let mut out = Vec::new();
    for item in split_top_level(statement, ',') {
        let item = item.trim();
        if item.is_empty() {
            continue;
        }
        let name = match item.find('(') {
            Some(pos) => item[..pos].trim_end(),
            None => item,
        };
        if !is_identifier(name) {
            return None;
        }
        out.push(JavaMember::EnumConstant {
            name: name.to_string(),
        });
    }
    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

fn top_level_eq_position(s: &str) -> Option<usize> {
    let mut depth = 0i32;
    for (i, c) in s.char_indices() {
        match c {
            '(' | '<' | '[' => depth += 1,
            ')' | '>' | ']' => depth -= 1,
            '=' if depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

fn contains_top_level_eq(s: &str) -> bool {
    top_level_eq_position(s).is_some()
}

fn split_top_level(s: &str, sep: char) -> Vec<&str> {
    let mut out = Vec::new();
    let mut depth = 0i32;
    let mut start = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '(' | '<' | '[' => depth += 1,
            ')' | '>' | ']' => depth -= 1,
            c if c == sep && depth == 0 => {
                out.push(&s[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    out.push(&s[start..]);
    out
}

fn strip_generic_spaces(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut angle = 0usize;
    for c in s.chars() {
        match c {
            '<' => {
                angle += 1;
                out.push(c);
            }
            '>' => {
                angle = angle.saturating_sub(1);
                out.push(c);
            }
            c if c.is_whitespace() && angle > 0 => {}
            c => out.push(c),
        }
    }
    out
}

fn split_array_suffix(token: &str) -> (&str, &str) {
    match token.find('[') {
        Some(pos) => (&token[..pos], &token[pos..]),
        None => (token, ""),
    }
}

fn is_modifier(token: &str) -> bool {
    matches!(
        token,
        "public"
            | "protected"
            | "private"
            | "static"
            | "final"
            | "abstract"
            | "synchronized"
            | "native"
            | "strictfp"
            | "transient"
            | "volatile"
            | "default"
            | "sealed"
            | "non-sealed"
    )
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

fn looks_like_type(s: &str) -> bool {
    !s.is_empty()
        && !is_modifier(s)
        && s.chars().next().is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> JavaSource {
        SourceScanner::new().parse(source).expect("parse")
    }

    #[test]
    fn scans_class_with_fields_and_methods() {
        let source = parse(
            r#"
            package com.example;

            import java.util.List;

            public class Widget {
                private String name;
                private int count = 0;

                public Widget(String name) {
                    this.name = name;
                }

                public String getName() {
                    return name;
                }

                public void resize(int width, int height) {
                }
            }
            "#,
        );

        assert_eq!(source.package.as_deref(), Some("com.example"));
        assert_eq!(source.name, "Widget");
        assert_eq!(source.kind, TypeKind::Class);

        let names: Vec<&str> = source.members.iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["name", "count", "Widget", "getName", "resize"]);

        assert_eq!(
            source.members[4],
            JavaMember::Method {
                name: "resize".into(),
                parameters: vec!["int".into(), "int".into()],
                return_type: Some("void".into()),
            }
        );
        // Constructor has no return type.
        assert_eq!(
            source.members[2],
            JavaMember::Method {
                name: "Widget".into(),
                parameters: vec!["String".into()],
                return_type: None,
            }
        );
    }

    #[test]
    fn scans_enum_constants_before_members() {
        let source = parse(
            r#"
            package com.example;

            public enum Color {
                RED(255), GREEN(0), BLUE(0);

                private final int red;

                Color(int red) {
                    this.red = red;
                }

                public int red() {
                    return red;
                }
            }
            "#,
        );

        assert_eq!(source.kind, TypeKind::Enum);
        let constants: Vec<&str> = source.enum_constants().map(|m| m.name()).collect();
        assert_eq!(constants, vec!["RED", "GREEN", "BLUE"]);
        assert!(source.methods().any(|m| m.name() == "red"));
    }

    #[test]
    fn scans_interface_methods() {
        let source = parse(
            r#"
            package com.example;

            public interface Shape {
                double area();
                void scale(double factor);
            }
            "#,
        );
        assert_eq!(source.kind, TypeKind::Interface);
        let names: Vec<&str> = source.members.iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["area", "scale"]);
    }

    #[test]
    fn overloads_share_a_raw_name() {
        let source = parse(
            r#"
            public class Overloaded {
                public void run(int count) {}
                public void run(String label) {}
            }
            "#,
        );
        let runs: Vec<String> = source
            .methods()
            .filter(|m| m.name() == "run")
            .map(|m| m.signature())
            .collect();
        assert_eq!(runs, vec!["run(int)", "run(String)"]);
    }

    #[test]
    fn ignores_declarations_inside_comments_and_strings() {
        let source = parse(
            r#"
            // class Fake {
            /* enum AlsoFake { A } */
            public class Real {
                private String banner = "class NotAType { }";
            }
            "#,
        );
        assert_eq!(source.name, "Real");
        assert_eq!(
            source.members,
            vec![JavaMember::Field {
                name: "banner".into(),
                type_name: "String".into(),
            }]
        );
    }

    #[test]
    fn lambda_initializer_is_a_field() {
        let source = parse(
            r#"
            public class Handlers {
                private Runnable onClose = () -> { cleanup(); };
                public void cleanup() {}
            }
            "#,
        );
        let names: Vec<&str> = source.members.iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["onClose", "cleanup"]);
    }

    #[test]
    fn skips_nested_types_but_keeps_outer_members() {
        let source = parse(
            r#"
            public class Outer {
                private int value;
                public static class Inner {
                    private int hidden;
                }
                public int value() { return value; }
            }
            "#,
        );
        let names: Vec<&str> = source.members.iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["value", "value"]);
    }

    #[test]
    fn record_components_become_fields() {
        let source = parse("public record Point(int x, int y) { }");
        assert_eq!(source.kind, TypeKind::Record);
        let names: Vec<&str> = source.fields().map(|m| m.name()).collect();
        assert_eq!(names, vec!["x", "y"]);
    }

    #[test]
    fn annotation_elements_are_methods() {
        let source = parse(
            r#"
            public @interface Marker {
                String value();
            }
            "#,
        );
        assert_eq!(source.kind, TypeKind::Annotation);
        assert!(source.methods().any(|m| m.name() == "value"));
    }

    #[test]
    fn missing_type_declaration_is_an_error() {
        let err = SourceScanner::new().parse("package com.example;\n").unwrap_err();
        assert!(matches!(err, SyntaxError::NoTypeDeclaration));
    }

    #[test]
    fn unbalanced_braces_are_an_error() {
        let err = SourceScanner::new()
            .parse("public class Broken { public void run() {")
            .unwrap_err();
        assert!(matches!(err, SyntaxError::UnbalancedBraces));
    }

    #[test]
    fn generic_types_survive_scanning() {
        let source = parse(
            r#"
            import java.util.Map;
            public class Registry {
                private Map<String, Integer> counts;
                public Map<String, Integer> counts() { return counts; }
            }
            "#,
        );
        assert_eq!(
            source.members[0],
            JavaMember::Field {
                name: "counts".into(),
                type_name: "Map<String,Integer>".into(),
            }
        );
    }

    #[test]
    fn rendered_source_reparses_to_same_shape() {
        let original = JavaSource::new(Some("com.example"), "Widget", TypeKind::Class)
            .with_member(JavaMember::Field {
                name: "name".into(),
                type_name: "String".into(),
            })
            .with_member(JavaMember::Method {
                name: "getName".into(),
                parameters: vec![],
                return_type: Some("String".into()),
            })
            .with_member(JavaMember::Method {
                name: "setName".into(),
                parameters: vec!["String".into()],
                return_type: Some("void".into()),
            });

        let reparsed = parse(&original.render());
        assert_eq!(reparsed.package, original.package);
        assert_eq!(reparsed.name, original.name);
        assert_eq!(reparsed.kind, original.kind);
        let original_names: Vec<&str> = original.members.iter().map(|m| m.name()).collect();
        let reparsed_names: Vec<&str> = reparsed.members.iter().map(|m| m.name()).collect();
        assert_eq!(reparsed_names, original_names);
    }
}
