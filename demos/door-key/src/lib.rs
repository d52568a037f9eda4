//! The door and the key: sample knotweave story.
//!
//! A cellar, a hall and a garden in three scenes. Exercises every kind of
//! state the compiler tracks:
//!
//! - `has_key` (global): survives scene changes;
//! - `door_opened` (flag): once set, can never be cleared;
//! - `lamp_lit` and `found_crack` (local): forgotten whenever the reader
//!   leaves the cellar.
//!
//! Conditional text, guarded choices, stay-in-place choices and an anchor
//! jump (`-> .walls`) all appear at least once.

use knotweave_artifact::{compile_with_entry, to_json, Compilation, CompileError};
use knotweave_core::ENTRY_UNIT;

/// Story source.
pub const SCRIPT: &str = r#"// title: The Door and the Key
// author: knotweave
// STATES: has_key
// FLAG-STATES: door_opened
// LOCAL-STATES: lamp_lit, found_crack

=== index ===
// scene: cellar
- {lamp_lit == false} It is pitch dark. Water drips somewhere.
- {lamp_lit == true && has_key == false} Lamplight shows a key on a hook.
- {lamp_lit == true} The empty hook glints in the lamplight.
* {lamp_lit == false} Light the lamp. ~ lamp_lit = true
* {lamp_lit == true && has_key == false} Take the key. ~ has_key = true
* {lamp_lit == true && found_crack == false} Examine the walls. ~ found_crack = true -> .walls
* {has_key == true} Climb the stairs. -> hall

=== hall ===
// scene: hall
- {door_opened == false} A locked door stands at the end of the hall.
- The door hangs open.
* {has_key == true && door_opened == false} Unlock the door. ~ door_opened = true
* {door_opened == true} Slam the door shut. ~ door_opened = false
* {door_opened == true} Step through. -> garden
* Go back down. -> index

=== garden ===
// scene: garden
Sunlight. You are free.
END
"#;

/// Compile [`SCRIPT`] from the `index` unit.
pub fn compile() -> Result<Compilation, CompileError> {
    compile_with_entry(SCRIPT, ENTRY_UNIT)
}

/// Compile [`SCRIPT`] straight to pretty artifact JSON.
pub fn artifact() -> Result<String, CompileError> {
    to_json(&compile()?.graph, true)
}
