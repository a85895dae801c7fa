use crate::markup::Markup;
use crate::parsing::Found;
use crate::parsing::cursor::Cursor;
use crate::render::RenderContext;

/// `{{[[TODO]]}}` or `{{[[DONE]]}}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkbox {
    checked: bool,
}

impl Checkbox {
    pub const TODO: &'static str = "{{[[TODO]]}}";
    pub const DONE: &'static str = "{{[[DONE]]}}";

    pub fn new(checked: bool) -> Self {
        Self { checked }
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    pub(crate) fn find(text: &str) -> Vec<Found> {
        let mut out = vec![];
        let mut cur = Cursor::new(text);
        while !cur.eof() {
            let checked = if cur.starts_with(Self::TODO.as_bytes()) {
                Some(false)
            } else if cur.starts_with(Self::DONE.as_bytes()) {
                Some(true)
            } else {
                None
            };
            match checked {
                Some(checked) => {
                    let start = cur.pos();
                    cur.bump_n(Self::TODO.len());
                    out.push(Found::new(start, cur.pos(), Checkbox { checked }));
                }
                None => {
                    cur.bump();
                }
            }
        }
        out
    }
}

impl Markup for Checkbox {
    fn to_source_text(&self) -> String {
        let text = if self.checked { Self::DONE } else { Self::TODO };
        text.to_string()
    }

    fn to_html(&self, _ctx: &RenderContext<'_>) -> String {
        let checked = if self.checked { r#" checked="""# } else { "" };
        format!(
            r#"<span><label class="check-container"><input type="checkbox"{checked}><span class="checkmark"></span></label></span>"#
        )
    }

    fn tags(&self) -> Vec<String> {
        vec![if self.checked { "DONE" } else { "TODO" }.to_string()]
    }
}
