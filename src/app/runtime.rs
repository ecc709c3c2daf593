use std::{sync::Arc, time::Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::layout::Rect;
use tokio::runtime::{Builder, Handle, Runtime};

use crate::{
    api::Gateway,
    domain::{Client, EntityKind, Ingredient, Order, Product, Recipe},
    presentation::{self, DialogRender, ToastRender, UiContext},
};

use super::{
    input::KeyAction,
    keymap,
    options::UiOptions,
    page::{AppNotifier, Page, PageView, PendingAction},
    status::StatusLine,
    terminal::TerminalGuard,
};

pub(crate) struct App {
    pages: Vec<Box<dyn PageView>>,
    tabs: Vec<String>,
    active: usize,
    notifier: AppNotifier,
    status: StatusLine,
    options: UiOptions,
    exit_armed: bool,
    should_quit: bool,
    // Dropped after the pages so no page outlives the runtime it spawns on.
    runtime: Option<Runtime>,
}

impl App {
    pub(crate) fn new(gateway: Arc<dyn Gateway>, options: UiOptions) -> Result<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("bakehouse-io")
            .enable_all()
            .build()
            .context("failed to start the async runtime")?;
        let mut app = Self::with_handle(gateway, runtime.handle().clone(), options);
        app.runtime = Some(runtime);
        Ok(app)
    }

    /// App spawning its requests on an existing runtime.
    pub(crate) fn with_handle(gateway: Arc<dyn Gateway>, handle: Handle, options: UiOptions) -> Self {
        let page_size = options.page_size;
        let pages: Vec<Box<dyn PageView>> = vec![
            Box::new(Page::<Client>::new(gateway.clone(), handle.clone(), &options)),
            Box::new(Page::<Ingredient>::new(gateway.clone(), handle.clone(), &options)),
            Box::new(Page::<Product>::new(gateway.clone(), handle.clone(), &options)),
            Box::new(
                Page::<Recipe>::new(gateway.clone(), handle.clone(), &options)
                    .with_items(page_size),
            ),
            Box::new(
                Page::<Order>::new(gateway, handle, &options)
                    .with_items(page_size)
                    .with_client_lookup(),
            ),
        ];
        Self {
            tabs: pages
                .iter()
                .map(|page| page.kind().title().to_string())
                .collect(),
            pages,
            active: 0,
            notifier: AppNotifier::new(options.toast_lifetime),
            status: StatusLine::new(),
            options,
            exit_armed: false,
            should_quit: false,
            runtime: None,
        }
    }

    pub(crate) fn run(&mut self) -> Result<()> {
        let mut terminal = TerminalGuard::new()?;
        self.start();
        while !self.should_quit {
            self.tick(Instant::now());
            terminal.draw(|frame| self.draw(frame))?;
            if !event::poll(self.options.tick_rate)? {
                continue;
            }
            match event::read()? {
                Event::Key(key) => self.handle_key(key),
                Event::Resize(width, height) => {
                    terminal.resize(Rect::new(0, 0, width, height))?;
                }
                _ => {}
            }
        }
        tracing::info!("bakehouse closed");
        Ok(())
    }

    pub(crate) fn start(&mut self) {
        tracing::info!(page = self.active_kind().title(), "bakehouse started");
        self.pages[self.active].mount(&mut self.status);
    }

    pub(crate) fn active_kind(&self) -> EntityKind {
        self.pages[self.active].kind()
    }

    #[cfg(test)]
    pub(crate) fn should_quit(&self) -> bool {
        self.should_quit
    }

    #[cfg(test)]
    pub(crate) fn notifier(&self) -> &AppNotifier {
        &self.notifier
    }

    /// Applies finished requests and expires the toast.
    pub(crate) fn tick(&mut self, now: Instant) {
        self.pages[self.active].poll(&mut self.notifier, &mut self.status);
        self.notifier.expire(now);
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let page = &self.pages[self.active];
        let render = page.render();
        let help = if self.options.show_help {
            keymap::help_text(page.context())
        } else {
            None
        };
        presentation::draw(
            frame,
            UiContext {
                tabs: &self.tabs,
                active_tab: self.active,
                page: &render,
                status_message: self.status.message(),
                help: help.as_deref(),
                popup: page.popup(),
                toast: self.notifier.toast().map(|toast| ToastRender {
                    level: toast.level,
                    message: &toast.message,
                }),
                dialog: self.notifier.dialog().map(|dialog| DialogRender {
                    title: &dialog.title,
                    message: &dialog.message,
                    confirm_label: &dialog.confirm_label,
                    confirm_selected: dialog.confirm_selected(),
                }),
            },
        );
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if self.notifier.has_dialog() {
            self.handle_dialog_key(&key);
            return;
        }
        let page = &mut self.pages[self.active];
        if page.handle_overlay_key(&key, &mut self.notifier, &mut self.status) {
            self.exit_armed = false;
            return;
        }
        let Some(action) = keymap::classify(page.context(), &key) else {
            if page.handle_input(&key, &mut self.status) {
                self.exit_armed = false;
            }
            return;
        };
        tracing::debug!(?action, "key action");
        match action {
            KeyAction::Quit => self.on_exit(),
            KeyAction::PageStep(delta) => {
                self.exit_armed = false;
                self.switch_page(delta);
            }
            other => {
                self.exit_armed = false;
                page.handle_action(other, &mut self.notifier, &mut self.status);
            }
        }
    }

    fn handle_dialog_key(&mut self, key: &KeyEvent) {
        let decision = match key.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::BackTab => {
                self.notifier.toggle_choice();
                return;
            }
            KeyCode::Enter => self.notifier.answer(),
            KeyCode::Char('y') | KeyCode::Char('Y') => self.notifier.resolve(true),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => self.notifier.resolve(false),
            _ => return,
        };
        match decision {
            Some(action) => self.dispatch_pending(action),
            None => self.status.ready(),
        }
    }

    fn dispatch_pending(&mut self, action: PendingAction) {
        let PendingAction::DeleteRecord { kind, .. } = action;
        if let Some(page) = self.pages.iter_mut().find(|page| page.kind() == kind) {
            page.confirmed(action, &mut self.status);
        }
    }

    fn switch_page(&mut self, delta: i32) {
        let len = self.pages.len() as i32;
        let next = (self.active as i32 + delta).rem_euclid(len) as usize;
        if next == self.active {
            return;
        }
        self.pages[self.active].unmount();
        self.active = next;
        self.pages[self.active].mount(&mut self.status);
    }

    fn on_exit(&mut self) {
        let editing = self.pages[self.active].is_editing();
        if self.options.confirm_exit && editing && !self.exit_armed {
            self.exit_armed = true;
            self.status.pending_exit();
            return;
        }
        self.should_quit = true;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crossterm::event::KeyModifiers;

    use super::*;
    use crate::api::MemoryGateway;

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    async fn wait_until(app: &mut App, done: impl Fn(&App) -> bool) {
        for _ in 0..200 {
            app.tick(Instant::now());
            if done(app) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("app did not settle");
    }

    fn demo_app() -> App {
        App::with_handle(
            Arc::new(MemoryGateway::demo()),
            Handle::current(),
            UiOptions::default(),
        )
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn tab_switches_between_pages() {
        let mut app = demo_app();
        app.start();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.active_kind(), EntityKind::Ingredient);
        app.handle_key(KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT));
        app.handle_key(KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT));
        assert_eq!(app.active_kind(), EntityKind::Order);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn quitting_while_editing_needs_a_second_press() {
        let mut app = demo_app();
        app.start();
        press(&mut app, KeyCode::Char('a'));
        let quit = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL);
        app.handle_key(quit);
        assert!(!app.should_quit());
        app.handle_key(quit);
        assert!(app.should_quit());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn delete_waits_for_confirmation() {
        let gateway = Arc::new(MemoryGateway::demo());
        let mut app = App::with_handle(gateway.clone(), Handle::current(), UiOptions::default());
        app.start();
        wait_until(&mut app, |app| app.status.message() != "Loading Clients...").await;

        press(&mut app, KeyCode::Char('d'));
        assert!(app.notifier().has_dialog());
        press(&mut app, KeyCode::Esc);
        assert!(!app.notifier().has_dialog());
        assert_eq!(gateway.records("Cliente").await.len(), 3);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        wait_until(&mut app, |app| {
            app.notifier()
                .toast()
                .is_some_and(|toast| toast.message == "Record deleted.")
        })
        .await;
        assert_eq!(gateway.records("Cliente").await.len(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn viewing_letters_do_not_reach_fields() {
        let mut app = demo_app();
        app.start();
        press(&mut app, KeyCode::Char('x'));
        assert!(!app.pages[app.active].is_editing());
        assert!(!app.should_quit());
    }
}
