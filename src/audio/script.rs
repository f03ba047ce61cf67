//! Browser sink: runs each command in the page's global script context
//!
//! The synth engine lives in page JavaScript. Each command is appended to
//! `<head>` as an inline script and removed right after it runs.

use web_sys::Document;

use super::command::{CommandSink, SynthCommand};

pub struct ScriptSink {
    document: Option<Document>,
}

impl Default for ScriptSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptSink {
    pub fn new() -> Self {
        let document = web_sys::window().and_then(|w| w.document());
        if document.is_none() {
            log::warn!("No document - bubble commands will be dropped");
        }
        Self { document }
    }

    fn run(&self, script: &str) -> Option<()> {
        let document = self.document.as_ref()?;
        let head = document.head()?;
        let element = document.create_element("script").ok()?;
        element.set_attribute("type", "text/javascript").ok()?;
        element.set_text_content(Some(script));
        head.append_child(&element).ok()?;
        head.remove_child(&element).ok()?;
        Some(())
    }
}

impl CommandSink for ScriptSink {
    fn dispatch(&mut self, command: SynthCommand) {
        // Fire-and-forget: a failed injection is not retried
        if self.run(&command.to_string()).is_none() {
            log::debug!("Dropped synth command: {command}");
        }
    }
}
