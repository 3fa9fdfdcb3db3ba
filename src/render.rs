use std::path::{Path, PathBuf};

use minijinja::{context, path_loader, Environment};
use minijinja_autoreload::AutoReloader;
use serde::Serialize;

use crate::assets::Assets;
use crate::constants::{CHAT_TEMPLATE, INPUT_PLACEHOLDER, PAGE_TITLE};
use crate::error::Result;
use crate::session::{Message, Role, SessionId, Transcript};

/// Icon shown next to a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Avatar {
    Person,
    Robot,
    /// Roles other than user/assistant get no icon.
    Blank,
}

impl Avatar {
    pub fn for_role(role: &Role) -> Self {
        match role {
            Role::User => Avatar::Person,
            Role::Assistant => Avatar::Robot,
            Role::Other(_) => Avatar::Blank,
        }
    }

    /// Material Symbols ligature name.
    pub fn icon(self) -> Option<&'static str> {
        match self {
            Avatar::Person => Some("person"),
            Avatar::Robot => Some("robot_2"),
            Avatar::Blank => None,
        }
    }

    /// Emoji used when the icon font is unavailable.
    pub fn glyph(self) -> Option<&'static str> {
        match self {
            Avatar::Person => Some("\u{1F464}"),
            Avatar::Robot => Some("\u{1F916}"),
            Avatar::Blank => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageView<'a> {
    pub role: &'a str,
    pub icon: Option<&'static str>,
    pub glyph: Option<&'static str>,
    pub content: &'a str,
}

impl<'a> From<&'a Message> for MessageView<'a> {
    fn from(message: &'a Message) -> Self {
        let avatar = Avatar::for_role(message.role());
        Self {
            role: message.role().as_str(),
            icon: avatar.icon(),
            glyph: avatar.glyph(),
            content: message.content(),
        }
    }
}

/// Page renderer backed by a template directory that is re-read when its
/// files change.
pub struct Renderer {
    templates: AutoReloader,
}

impl Renderer {
    pub fn new(templates_dir: impl AsRef<Path>) -> Self {
        let dir: PathBuf = templates_dir.as_ref().to_path_buf();
        let templates = AutoReloader::new(move |notifier| {
            let mut env = Environment::new();
            env.set_loader(path_loader(&dir));
            notifier.watch_path(&dir, true);
            Ok(env)
        });
        Self { templates }
    }

    /// Fails early when the chat template is missing or does not parse.
    pub fn check(&self) -> Result<()> {
        let env = self.templates.acquire_env()?;
        env.get_template(CHAT_TEMPLATE)?;
        Ok(())
    }

    pub fn render_chat(&self, session: SessionId, transcript: &Transcript, assets: &Assets) -> Result<String> {
        let messages: Vec<MessageView<'_>> = transcript.iter().map(MessageView::from).collect();
        let env = self.templates.acquire_env()?;
        let tmpl = env.get_template(CHAT_TEMPLATE)?;
        let html = tmpl.render(context! {
            title => PAGE_TITLE,
            placeholder => INPUT_PLACEHOLDER,
            session_id => session.to_string(),
            messages => messages,
            assets => assets,
        })?;
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;

    fn renderer() -> Renderer {
        Renderer::new(concat!(env!("CARGO_MANIFEST_DIR"), "/templates"))
    }

    #[test]
    fn test_avatar_for_known_roles() {
        assert_eq!(Avatar::for_role(&Role::User), Avatar::Person);
        assert_eq!(Avatar::for_role(&Role::Assistant), Avatar::Robot);
        assert_eq!(Avatar::Person.icon(), Some("person"));
        assert_eq!(Avatar::Robot.icon(), Some("robot_2"));
    }

    #[test]
    fn test_unknown_role_has_no_icon() {
        let avatar = Avatar::for_role(&Role::from("system"));
        assert_eq!(avatar, Avatar::Blank);
        assert!(avatar.icon().is_none());
        assert!(avatar.glyph().is_none());
    }

    #[test]
    fn test_template_is_present() {
        renderer().check().unwrap();
    }

    #[test]
    fn test_render_chat_escapes_content_and_marks_roles() {
        let mut session = Session::new();
        session.append(Role::User, "<b>Hello</b>");
        session.append(Role::Assistant, "Lorem ipsum dolor.");
        session.append(Role::from("narrator"), "aside");

        let assets = Assets {
            style_css: "body { color: black; }".to_string(),
            alignment_css: String::new(),
            scroll_js: "scrollToBottom();".to_string(),
        };
        let id = SessionId::new();
        let html = renderer().render_chat(id, &session.all(), &assets).unwrap();

        assert!(html.contains("<title>chatbot</title>"));
        assert!(html.contains("&lt;b&gt;Hello"));
        assert!(!html.contains("<b>Hello</b>"));
        assert!(html.contains("chat-user"));
        assert!(html.contains("chat-assistant"));
        assert!(html.contains("chat-narrator"));
        assert!(html.contains("robot_2"));
        assert!(html.contains("body { color: black; }"));
        assert!(html.contains("scrollToBottom();"));
        assert!(html.contains(&format!("/session/{}", id)));
        assert!(html.contains(INPUT_PLACEHOLDER));
    }

    #[test]
    fn test_render_empty_transcript() {
        let html = renderer()
            .render_chat(SessionId::new(), &Transcript::default(), &Assets::default())
            .unwrap();
        assert!(!html.contains("chat-row"));
    }
}
