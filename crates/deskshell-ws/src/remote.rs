/*!
Content rendered by the browser front end.

The bridge cannot draw pages itself. Each window gets a `RemoteContent` that
just holds the resolver; the front end reports back with `content_ready` or
`content_failed` once its page has loaded.
*/

use std::any::Any;
use std::sync::Arc;

use deskshell::{AppId, Content, ContentContext, ContentResolver, Desktop, SharedFactory};

/// Placeholder for a page that lives in the browser.
#[derive(Debug, Clone)]
pub struct RemoteContent {
  resolver: ContentResolver,
}

impl RemoteContent {
  /// Factory for launcher entries whose pages the front end renders.
  pub fn factory() -> SharedFactory {
    Arc::new(|ctx: ContentContext| Ok(Box::new(Self::from(ctx)) as Box<dyn Content>))
  }

  /// Resolver for `window`, if it is open and hosts remote content.
  pub fn resolver(desktop: &Desktop, window: &AppId) -> Option<ContentResolver> {
    desktop.with_content(window, |c: &Self| c.resolver.clone())
  }
}

impl From<ContentContext> for RemoteContent {
  fn from(ctx: ContentContext) -> Self {
    Self {
      resolver: ctx.resolver,
    }
  }
}

impl Content for RemoteContent {
  fn on_mount(&mut self, window: &AppId) {
    log::debug!("[remote] waiting for front end to load {window}");
  }

  fn as_any(&self) -> &dyn Any {
    self
  }
}
