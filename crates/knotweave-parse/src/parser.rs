//! Line scanner that assembles a [`Script`].

use knotweave_core::{Script, TextBlock, Unit, VarClass};
use tracing::{debug, warn};

use crate::error::{ParseError, Result};
use crate::line::{parse_choice, parse_text_block};

/// Parse script text into the unit model.
///
/// ```text
/// // title: The Locked Door
/// // STATES: has_key
///
/// === index ===
/// The door is locked.
/// * {has_key == false} Look for a key. ~ has_key = true
/// * {has_key == true} Open the door. -> victory
///
/// === victory ===
/// You opened the door!
/// END
/// ```
pub fn parse_script(source: &str) -> Result<Script> {
    let mut parser = Parser::default();
    for (idx, raw) in source.lines().enumerate() {
        parser.line(raw, idx + 1)?;
    }
    parser.finish()
}

#[derive(Default)]
struct Parser {
    script: Script,
    unit: Option<Unit>,
    /// Index into the current unit's body of the block still accepting text.
    block: Option<usize>,
}

impl Parser {
    fn line(&mut self, raw: &str, line: usize) -> Result<()> {
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            // Paragraph break inside a block.
            if let Some(block) = self.open_block() {
                block.content.push('\n');
            }
            return Ok(());
        }

        if let Some(name) = unit_header(trimmed) {
            return self.start_unit(name, line);
        }

        if self.unit.is_none() {
            if let Some(comment) = trimmed.strip_prefix("//") {
                self.header(comment);
            }
            return Ok(());
        }
        self.unit_line(trimmed, line)
    }

    /// Handle a non-blank line inside a unit.
    fn unit_line(&mut self, trimmed: &str, line: usize) -> Result<()> {
        let Some(unit) = self.unit.as_mut() else {
            return Ok(());
        };

        if let Some(comment) = trimmed.strip_prefix("//") {
            self.block = None;
            if let Some((key, value)) = comment.split_once(':') {
                if key.trim() == "scene" {
                    unit.scene = value.trim().to_string();
                }
            }
        } else if trimmed == "END" {
            self.block = None;
            unit.is_end = true;
        } else if trimmed.starts_with('*') {
            self.block = None;
            unit.choices.push(parse_choice(trimmed, line)?);
        } else if trimmed.starts_with('-') {
            unit.body.push(parse_text_block(trimmed, line)?);
            self.block = Some(unit.body.len() - 1);
        } else {
            match self.block.and_then(|idx| unit.body.get(idx).map(|_| idx)) {
                Some(idx) => {
                    let content = &mut unit.body[idx].content;
                    content.push('\n');
                    content.push_str(trimmed);
                }
                None => {
                    unit.body.push(TextBlock::new(trimmed));
                    self.block = Some(unit.body.len() - 1);
                }
            }
        }
        Ok(())
    }

    /// Handle a `// KEY: value` header line.
    fn header(&mut self, comment: &str) {
        let Some((key, value)) = comment.split_once(':') else {
            return;
        };
        let (key, value) = (key.trim(), value.trim());
        let class = match key.to_ascii_uppercase().as_str() {
            "STATES" => VarClass::Global,
            "FLAG-STATES" => VarClass::Flag,
            "LOCAL-STATES" => VarClass::Local,
            _ => {
                self.script.metadata.insert(key.to_string(), value.to_string());
                return;
            }
        };
        for name in value.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            self.script.declarations.declare(name, class);
        }
    }

    fn start_unit(&mut self, name: &str, line: usize) -> Result<()> {
        self.finish_unit();
        if name.is_empty() {
            return Err(ParseError::EmptyUnitName { line });
        }
        if self.script.contains_unit(name) {
            return Err(ParseError::DuplicateUnit {
                line,
                name: name.to_string(),
            });
        }
        self.unit = Some(Unit::new(name));
        Ok(())
    }

    fn open_block(&mut self) -> Option<&mut TextBlock> {
        let idx = self.block?;
        self.unit.as_mut()?.body.get_mut(idx)
    }

    fn finish_unit(&mut self) {
        self.block = None;
        if let Some(mut unit) = self.unit.take() {
            for block in &mut unit.body {
                block.content = block.content.trim().to_string();
            }
            debug!(
                unit = %unit.name,
                scene = %unit.scene,
                blocks = unit.body.len(),
                choices = unit.choices.len(),
                "parsed unit"
            );
            self.script.add_unit(unit);
        }
    }

    fn finish(mut self) -> Result<Script> {
        self.finish_unit();
        for name in self.script.declarations.overlaps() {
            warn!(variable = name, "variable declared in more than one class");
        }
        debug!(
            units = self.script.unit_count(),
            variables = self.script.declarations.len(),
            "parsed script"
        );
        Ok(self.script)
    }
}

/// Name inside an `=== name ===` line, if `line` is one.
fn unit_header(line: &str) -> Option<&str> {
    if !line.starts_with("===") || !line.ends_with("===") {
        return None;
    }
    if line.len() < 6 {
        return Some("");
    }
    Some(line[3..line.len() - 3].trim())
}

#[cfg(test)]
mod tests {
    use knotweave_core::{Condition, Destination, StateVector};

    use super::*;

    const DOOR: &str = r#"
// title: My Story
// author: Someone
// STATES: has_key

=== index ===
The door is locked.
* {has_key == false} Look for a key. ~ has_key = true
* {has_key == true} Open the door. -> victory

=== victory ===
You opened the door!
END
"#;

    #[test]
    fn parses_header_units_and_choices() {
        let script = parse_script(DOOR).unwrap();
        assert_eq!(script.metadata["title"], "My Story");
        assert_eq!(script.metadata["author"], "Someone");
        assert!(script.declarations.global.contains("has_key"));
        assert_eq!(script.unit_count(), 2);

        let index = script.unit("index").unwrap();
        assert_eq!(index.body.len(), 1);
        assert_eq!(index.body[0].content, "The door is locked.");
        assert_eq!(index.choices.len(), 2);
        assert_eq!(index.choices[1].destination, Destination::Unit("victory".into()));
        assert!(!index.is_end);

        assert!(script.unit("victory").unwrap().is_end);
    }

    #[test]
    fn declaration_keys_are_case_insensitive() {
        let script = parse_script(
            "// states: a, b\n// Flag-States: f\n// LOCAL-STATES: l,\n=== index ===\n",
        )
        .unwrap();
        let decls = &script.declarations;
        assert_eq!(decls.global.len(), 2);
        assert!(decls.flag.contains("f"));
        assert_eq!(decls.local.len(), 1);
        assert!(script.metadata.is_empty());
    }

    #[test]
    fn header_comments_without_colon_are_ignored() {
        let script = parse_script("// just a note\nstray header text\n=== index ===\n").unwrap();
        assert!(script.metadata.is_empty());
        assert!(script.unit("index").unwrap().body.is_empty());
    }

    #[test]
    fn scene_directive_and_unit_comments() {
        let script = parse_script(
            "=== room1 ===\n// scene: bedroom\n// a note: not a scene\n* Leave. -> room1\n",
        )
        .unwrap();
        let unit = script.unit("room1").unwrap();
        assert_eq!(unit.scene, "bedroom");
        assert!(script.metadata.is_empty());
    }

    #[test]
    fn indented_continuation_joins_block() {
        let script = parse_script(
            "// STATES: power_on\n=== index ===\n- {power_on == false} The room is dark.\n  It is very spooky.\n- {power_on == true} The lights are on.\n* Flip switch. ~ power_on = true\n",
        )
        .unwrap();
        let unit = script.unit("index").unwrap();
        assert_eq!(unit.body.len(), 2);
        assert_eq!(unit.body[0].content, "The room is dark.\nIt is very spooky.");
        assert_eq!(unit.body[0].condition, Condition::always().is("power_on", false));

        let on = StateVector::new().with("power_on", true);
        assert_eq!(unit.content_for(&on), "The lights are on.");
    }

    #[test]
    fn blank_line_is_a_paragraph_break() {
        let source = "=== index ===\nFirst paragraph.\n\nSecond paragraph.\n\n* Go. -> index\n";
        let script = parse_script(source).unwrap();
        let unit = script.unit("index").unwrap();
        assert_eq!(unit.body.len(), 1);
        assert_eq!(unit.body[0].content, "First paragraph.\n\nSecond paragraph.");
    }

    #[test]
    fn text_after_choice_starts_new_block() {
        let script = parse_script("=== index ===\nIntro.\n* Go. -> index\nOutro.\n").unwrap();
        let unit = script.unit("index").unwrap();
        assert_eq!(unit.body.len(), 2);
        assert_eq!(unit.body[1].content, "Outro.");
    }

    #[test]
    fn structural_errors_carry_line_numbers() {
        assert_eq!(
            parse_script("=== index ===\n\n===   ===\n"),
            Err(ParseError::EmptyUnitName { line: 3 })
        );
        assert_eq!(
            parse_script("=== index ===\n=== index ===\n"),
            Err(ParseError::DuplicateUnit {
                line: 2,
                name: "index".into()
            })
        );
        assert_eq!(
            parse_script("=== index ===\n* {a == true Go\n").unwrap_err().line(),
            2
        );
    }

    #[test]
    fn short_header_is_an_empty_name() {
        assert_eq!(unit_header("===="), Some(""));
        assert_eq!(unit_header("=== a ==="), Some("a"));
        assert_eq!(unit_header("=== a"), None);
    }
}
