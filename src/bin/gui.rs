use iced::advanced::subscription::{self, Event, Hasher, Recipe};
use iced::futures::stream::BoxStream;
use iced::keyboard::{self, Key, Modifiers};
use iced::widget::{
    button, column, container, horizontal_rule, horizontal_space, mouse_area, opaque,
    progress_bar, row, scrollable, stack, text, text_input, vertical_rule, Space,
};
use iced::{alignment, Alignment, Background, Color, Element, Length, Subscription, Task, Theme};

use file_explorer::format::{created_label, describe, icon_for, size_label, type_label};
use file_explorer::navigator::validate_name;
use file_explorer::notice::NOTICE_TTL;
use file_explorer::progress::{percent, PROGRESS_RESET_DELAY};
use file_explorer::{
    Activation, ExplorerClient, ExplorerConfig, Folder, Mutation, Node, NoticeKind, ProgressFn,
    RemoteTree, UploadProgress, ViewState,
};
use std::hash::Hash;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

/// Theme mode for light/dark appearance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ThemeMode {
    #[default]
    Light,
    Dark,
}

/// Windows Fluent-inspired color palette
#[derive(Debug, Clone, Copy)]
struct ThemeColors {
    // Backgrounds
    bg_base: Color,
    bg_surface: Color,
    bg_elevated: Color,
    bg_hover: Color,
    bg_selected: Color,

    // Text
    text_primary: Color,
    text_secondary: Color,
    text_disabled: Color,

    // Accent
    accent: Color,
    accent_hover: Color,
    accent_pressed: Color,

    // Borders
    border: Color,
    border_strong: Color,

    // Status colors
    success: Color,
    error: Color,

    // Dividers
    divider: Color,
}

impl ThemeColors {
    fn dark() -> Self {
        Self {
            bg_base: Color::from_rgb(0.12, 0.12, 0.12),
            bg_surface: Color::from_rgb(0.16, 0.16, 0.16),
            bg_elevated: Color::from_rgb(0.20, 0.20, 0.20),
            bg_hover: Color::from_rgb(0.24, 0.24, 0.24),
            bg_selected: Color::from_rgb(0.20, 0.30, 0.45),

            text_primary: Color::from_rgb(1.0, 1.0, 1.0),
            text_secondary: Color::from_rgb(0.70, 0.70, 0.70),
            text_disabled: Color::from_rgb(0.45, 0.45, 0.45),

            accent: Color::from_rgb(0.38, 0.56, 0.89),
            accent_hover: Color::from_rgb(0.45, 0.63, 0.95),
            accent_pressed: Color::from_rgb(0.30, 0.48, 0.78),

            border: Color::from_rgb(0.28, 0.28, 0.28),
            border_strong: Color::from_rgb(0.40, 0.40, 0.40),

            success: Color::from_rgb(0.35, 0.75, 0.45),
            error: Color::from_rgb(0.90, 0.35, 0.35),

            divider: Color::from_rgb(0.22, 0.22, 0.22),
        }
    }

    fn light() -> Self {
        Self {
            // #f5f5f5 page, white paper, #1976d2 primary
            bg_base: Color::from_rgb(0.96, 0.96, 0.96),
            bg_surface: Color::from_rgb(1.0, 1.0, 1.0),
            bg_elevated: Color::from_rgb(0.98, 0.98, 0.98),
            bg_hover: Color::from_rgb(0.93, 0.93, 0.93),
            bg_selected: Color::from_rgba(0.098, 0.463, 0.824, 0.08),

            text_primary: Color::from_rgb(0.10, 0.10, 0.10),
            text_secondary: Color::from_rgb(0.40, 0.40, 0.40),
            text_disabled: Color::from_rgb(0.60, 0.60, 0.60),

            accent: Color::from_rgb(0.098, 0.463, 0.824),
            accent_hover: Color::from_rgb(0.16, 0.53, 0.88),
            accent_pressed: Color::from_rgb(0.05, 0.40, 0.72),

            border: Color::from_rgb(0.85, 0.85, 0.85),
            border_strong: Color::from_rgb(0.70, 0.70, 0.70),

            success: Color::from_rgb(0.15, 0.60, 0.30),
            error: Color::from_rgb(0.86, 0.0, 0.31),

            divider: Color::from_rgb(0.90, 0.90, 0.90),
        }
    }

    fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Self::light(),
            ThemeMode::Dark => Self::dark(),
        }
    }
}

pub fn main() -> iced::Result {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("file_explorer=warn,explorer_gui=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    iced::application("File Explorer", ExplorerGui::update, ExplorerGui::view)
        .theme(ExplorerGui::theme)
        .subscription(ExplorerGui::subscription)
        .run_with(ExplorerGui::new)
}

fn dialog_input_id() -> text_input::Id {
    text_input::Id::new("dialog-name")
}

/// What a name dialog is for.
#[derive(Debug, Clone)]
enum NamePurpose {
    CreateFolder,
    Rename(Node),
}

#[derive(Debug, Clone)]
struct NameDialog {
    purpose: NamePurpose,
    name: String,
    error: Option<String>,
    pending: bool,
}

#[derive(Debug, Clone, Default)]
enum Dialog {
    #[default]
    None,
    Name(NameDialog),
    ConfirmDelete(Node),
}

#[derive(Debug, Clone)]
struct ActiveUpload {
    id: u64,
    path: PathBuf,
    parent_id: String,
}

struct ExplorerGui {
    client: ExplorerClient,
    view: ViewState,
    dialog: Dialog,
    upload: Option<ActiveUpload>,
    upload_progress: UploadProgress,
    next_upload_id: u64,
    drag_active: bool,
    theme_mode: ThemeMode,
}

struct UploadRecipe {
    upload: ActiveUpload,
    client: ExplorerClient,
}

impl Recipe for UploadRecipe {
    type Output = Message;

    fn hash(&self, state: &mut Hasher) {
        use std::any::TypeId;
        TypeId::of::<Self>().hash(state);
        self.upload.id.hash(state);
    }

    fn stream(self: Box<Self>, _input: BoxStream<Event>) -> BoxStream<Message> {
        let ActiveUpload {
            id,
            path,
            parent_id,
        } = self.upload.clone();
        let client = self.client.clone();

        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<u8>();
        let progress: ProgressFn = Arc::new(move |sent, total| {
            let _ = tx.send(percent(sent, total));
        });

        let upload_stream = async_stream::stream! {
            let mut handle = tokio::spawn(async move {
                client
                    .upload_file(&path, &parent_id, progress)
                    .await
                    .map_err(|e| e.to_string())
            });

            let mut progress_open = true;
            let result = loop {
                tokio::select! {
                    pct = rx.recv(), if progress_open => match pct {
                        Some(pct) => yield Message::UploadProgressed(id, pct),
                        None => progress_open = false,
                    },
                    joined = &mut handle => {
                        break joined.unwrap_or_else(|e| Err(e.to_string()));
                    }
                }
            };

            yield Message::UploadFinished(id, result);
        };

        Box::pin(upload_stream)
    }
}

#[derive(Debug, Clone)]
enum Message {
    // Navigation
    LoadRoot,
    RootLoaded(Result<Folder, String>),
    NavigateTo(String),
    FolderLoaded(Result<Folder, String>),
    Refresh,
    ItemClicked(String),
    // Create / rename
    NewFolderPressed,
    RenamePressed(Node),
    DialogNameChanged(String),
    DialogSubmit,
    FolderCreated(String, Result<Node, String>),
    Renamed(String, Result<Node, String>),
    // Delete
    DeletePressed(Node),
    DeleteConfirmed,
    Deleted(String, Result<(), String>),
    CloseDialog,
    // Upload
    UploadPressed,
    UploadPicked(Option<PathBuf>),
    FileHovered,
    FilesHoveredLeft,
    FileDropped(PathBuf),
    UploadProgressed(u64, u8),
    UploadFinished(u64, Result<Node, String>),
    ClearUploadProgress(u64),
    // Download
    DownloadPressed(Node),
    DownloadDestPicked(Node, Option<PathBuf>),
    Downloaded(Result<PathBuf, String>),
    // Notices
    Tick,
    DismissNotice(u64),
    // Misc
    KeyboardEvent(Key, Modifiers),
    ToggleTheme,
}

impl ExplorerGui {
    fn new() -> (Self, Task<Message>) {
        let mut view = ViewState::new();
        let config = match ExplorerConfig::from_env() {
            Ok(config) => config,
            Err(e) => {
                view.notices.error(e.to_string());
                ExplorerConfig::default()
            }
        };
        debug!("using service at {}", config.files_base());

        let mut gui = Self {
            client: ExplorerClient::new(&config),
            view,
            dialog: Dialog::None,
            upload: None,
            upload_progress: UploadProgress::new(),
            next_upload_id: 0,
            drag_active: false,
            theme_mode: ThemeMode::default(),
        };
        let task = gui.update(Message::LoadRoot);
        (gui, task)
    }

    fn theme(&self) -> Theme {
        match self.theme_mode {
            ThemeMode::Light => Theme::Light,
            ThemeMode::Dark => Theme::Dark,
        }
    }

    /// Get current theme colors
    fn colors(&self) -> ThemeColors {
        ThemeColors::for_mode(self.theme_mode)
    }

    fn subscription(&self) -> Subscription<Message> {
        let keyboard_sub =
            keyboard::on_key_press(|key, modifiers| Some(Message::KeyboardEvent(key, modifiers)));

        let drop_sub = iced::event::listen_with(|event, _status, _window| match event {
            iced::Event::Window(iced::window::Event::FileHovered(_)) => Some(Message::FileHovered),
            iced::Event::Window(iced::window::Event::FilesHoveredLeft) => {
                Some(Message::FilesHoveredLeft)
            }
            iced::Event::Window(iced::window::Event::FileDropped(path)) => {
                Some(Message::FileDropped(path))
            }
            _ => None,
        });

        let upload_sub = match &self.upload {
            Some(upload) => subscription::from_recipe(UploadRecipe {
                upload: upload.clone(),
                client: self.client.clone(),
            }),
            None => Subscription::none(),
        };

        let notice_sub = if self.view.notices.is_empty() {
            Subscription::none()
        } else {
            iced::time::every(Duration::from_millis(250)).map(|_| Message::Tick)
        };

        Subscription::batch([keyboard_sub, drop_sub, upload_sub, notice_sub])
    }

    fn navigate(&mut self, folder_id: String) -> Task<Message> {
        self.view.begin_load();
        let client = self.client.clone();
        Task::perform(
            async move {
                client
                    .get_folder(&folder_id)
                    .await
                    .map_err(|e| e.to_string())
            },
            Message::FolderLoaded,
        )
    }

    fn current_folder(&self) -> Option<String> {
        self.view.current_folder_id().map(str::to_string)
    }

    fn start_upload(&mut self, path: PathBuf) -> Task<Message> {
        if self.upload.is_some() {
            debug!("upload already running, ignoring {}", path.display());
            return Task::none();
        }
        let Some(parent_id) = self.current_folder() else {
            return Task::none();
        };
        if !path.is_file() {
            self.view
                .notices
                .error(format!("Cannot upload {}: not a file", path.display()));
            return Task::none();
        }

        self.next_upload_id += 1;
        self.upload_progress.begin();
        self.upload = Some(ActiveUpload {
            id: self.next_upload_id,
            path,
            parent_id,
        });
        Task::none()
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::LoadRoot => {
                self.view.begin_load();
                let client = self.client.clone();
                Task::perform(
                    async move { client.get_root().await.map_err(|e| e.to_string()) },
                    Message::RootLoaded,
                )
            }
            Message::RootLoaded(result) => {
                self.view.apply_root(result);
                Task::none()
            }
            Message::NavigateTo(folder_id) => self.navigate(folder_id),
            Message::FolderLoaded(result) => {
                self.view.apply_folder(result);
                Task::none()
            }
            Message::Refresh => match self.current_folder() {
                Some(id) => self.navigate(id),
                None => self.update(Message::LoadRoot),
            },
            Message::ItemClicked(id) => match self.view.activate(&id) {
                Activation::Navigate(folder_id) => self.navigate(folder_id),
                Activation::Selected | Activation::Unknown => Task::none(),
            },

            Message::NewFolderPressed => {
                self.dialog = Dialog::Name(NameDialog {
                    purpose: NamePurpose::CreateFolder,
                    name: String::new(),
                    error: None,
                    pending: false,
                });
                text_input::focus(dialog_input_id())
            }
            Message::RenamePressed(item) => {
                self.dialog = Dialog::Name(NameDialog {
                    name: item.name.clone(),
                    purpose: NamePurpose::Rename(item),
                    error: None,
                    pending: false,
                });
                text_input::focus(dialog_input_id())
            }
            Message::DialogNameChanged(name) => {
                if let Dialog::Name(dialog) = &mut self.dialog {
                    dialog.name = name;
                    dialog.error = None;
                }
                Task::none()
            }
            Message::DialogSubmit => {
                let Some(folder_id) = self.current_folder() else {
                    return Task::none();
                };
                let Dialog::Name(dialog) = &mut self.dialog else {
                    return Task::none();
                };
                if dialog.pending {
                    return Task::none();
                }
                if let Err(e) = validate_name(&dialog.name) {
                    dialog.error = Some(e.to_string());
                    return Task::none();
                }
                let name = dialog.name.clone();
                dialog.pending = true;

                let client = self.client.clone();
                match dialog.purpose.clone() {
                    NamePurpose::CreateFolder => Task::perform(
                        async move {
                            let result = client
                                .create_folder(&name, &folder_id)
                                .await
                                .map_err(|e| e.to_string());
                            (folder_id, result)
                        },
                        |(parent, result)| Message::FolderCreated(parent, result),
                    ),
                    NamePurpose::Rename(item) => Task::perform(
                        async move {
                            let result = client
                                .rename(&item.id, &name)
                                .await
                                .map_err(|e| e.to_string());
                            (folder_id, result)
                        },
                        |(folder, result)| Message::Renamed(folder, result),
                    ),
                }
            }
            Message::FolderCreated(parent_id, result) => {
                self.finish_mutation(Mutation::CreateFolder, parent_id, &result)
            }
            Message::Renamed(folder_id, result) => {
                self.finish_mutation(Mutation::Rename, folder_id, &result)
            }

            Message::DeletePressed(item) => {
                self.dialog = Dialog::ConfirmDelete(item);
                Task::none()
            }
            Message::DeleteConfirmed => {
                let Dialog::ConfirmDelete(item) = std::mem::take(&mut self.dialog) else {
                    return Task::none();
                };
                let Some(folder_id) = self.current_folder() else {
                    return Task::none();
                };
                let client = self.client.clone();
                Task::perform(
                    async move {
                        let result = client.delete(&item.id).await.map_err(|e| e.to_string());
                        (folder_id, result)
                    },
                    |(folder, result)| Message::Deleted(folder, result),
                )
            }
            Message::Deleted(folder_id, result) => {
                self.finish_mutation(Mutation::Delete, folder_id, &result)
            }
            Message::CloseDialog => {
                self.dialog = Dialog::None;
                Task::none()
            }

            Message::UploadPressed => Task::perform(
                async {
                    rfd::AsyncFileDialog::new()
                        .pick_file()
                        .await
                        .map(|h| h.path().to_path_buf())
                },
                Message::UploadPicked,
            ),
            Message::UploadPicked(path) => match path {
                Some(path) => self.start_upload(path),
                None => Task::none(),
            },
            Message::FileHovered => {
                self.drag_active = true;
                Task::none()
            }
            Message::FilesHoveredLeft => {
                self.drag_active = false;
                Task::none()
            }
            Message::FileDropped(path) => {
                self.drag_active = false;
                self.start_upload(path)
            }
            Message::UploadProgressed(id, pct) => {
                if self.upload.as_ref().is_some_and(|u| u.id == id) {
                    self.upload_progress.set(pct);
                }
                Task::none()
            }
            Message::UploadFinished(id, result) => {
                if self.upload.as_ref().map_or(true, |u| u.id != id) {
                    return Task::none();
                }
                let Some(upload) = self.upload.take() else {
                    return Task::none();
                };
                if result.is_ok() {
                    self.upload_progress.set(100);
                }
                let generation = self.upload_progress.generation();
                let clear = Task::perform(tokio::time::sleep(PROGRESS_RESET_DELAY), move |()| {
                    Message::ClearUploadProgress(generation)
                });
                let refresh = self.finish_mutation(Mutation::Upload, upload.parent_id, &result);
                Task::batch([refresh, clear])
            }
            Message::ClearUploadProgress(generation) => {
                self.upload_progress.reset_if_current(generation);
                Task::none()
            }

            Message::DownloadPressed(item) => Task::perform(
                async {
                    rfd::AsyncFileDialog::new()
                        .pick_folder()
                        .await
                        .map(|h| h.path().to_path_buf())
                },
                move |dest| Message::DownloadDestPicked(item.clone(), dest),
            ),
            Message::DownloadDestPicked(item, dest) => {
                let Some(dest) = dest else {
                    return Task::none();
                };
                let client = self.client.clone();
                Task::perform(
                    async move {
                        client
                            .download(&item.id, &dest, Some(&item.name))
                            .await
                            .map_err(|e| e.to_string())
                    },
                    Message::Downloaded,
                )
            }
            Message::Downloaded(result) => {
                match result {
                    Ok(path) => self
                        .view
                        .notices
                        .success(format!("Saved to {}", path.display())),
                    Err(e) => {
                        warn!("download failed: {e}");
                        self.view
                            .notices
                            .error(format!("Failed to download file: {e}"));
                    }
                }
                Task::none()
            }

            Message::Tick => {
                self.view
                    .notices
                    .expire(std::time::Instant::now(), NOTICE_TTL);
                Task::none()
            }
            Message::DismissNotice(id) => {
                self.view.notices.dismiss(id);
                Task::none()
            }

            Message::KeyboardEvent(key, modifiers) => self.handle_key(key, modifiers),
            Message::ToggleTheme => {
                self.theme_mode = match self.theme_mode {
                    ThemeMode::Light => ThemeMode::Dark,
                    ThemeMode::Dark => ThemeMode::Light,
                };
                Task::none()
            }
        }
    }

    /// Reports a settled mutation and re-fetches `folder_id` on success.
    ///
    /// A failed create or rename keeps its dialog open for another try.
    fn finish_mutation<T>(
        &mut self,
        mutation: Mutation,
        folder_id: String,
        result: &Result<T, String>,
    ) -> Task<Message> {
        let ok = self.view.record(mutation, result);
        match mutation {
            Mutation::CreateFolder | Mutation::Rename => {
                if ok {
                    self.dialog = Dialog::None;
                } else if let Dialog::Name(dialog) = &mut self.dialog {
                    dialog.pending = false;
                }
            }
            Mutation::Delete | Mutation::Upload => {}
        }
        if ok {
            self.navigate(folder_id)
        } else {
            Task::none()
        }
    }

    fn handle_key(&mut self, key: Key, modifiers: Modifiers) -> Task<Message> {
        match &self.dialog {
            Dialog::None => {}
            Dialog::Name(_) => {
                // Enter is delivered through the input's on_submit.
                if matches!(key, Key::Named(keyboard::key::Named::Escape)) {
                    return self.update(Message::CloseDialog);
                }
                return Task::none();
            }
            Dialog::ConfirmDelete(_) => {
                return match key {
                    Key::Named(keyboard::key::Named::Escape) => self.update(Message::CloseDialog),
                    Key::Named(keyboard::key::Named::Enter) => {
                        self.update(Message::DeleteConfirmed)
                    }
                    _ => Task::none(),
                };
            }
        }

        match key {
            // Ctrl+R or F5: Refresh
            Key::Character(c) if c.as_str() == "r" && modifiers.control() => {
                self.update(Message::Refresh)
            }
            Key::Named(keyboard::key::Named::F5) => self.update(Message::Refresh),

            // Ctrl+N: New folder
            Key::Character(c) if c.as_str() == "n" && modifiers.control() => {
                self.update(Message::NewFolderPressed)
            }

            // Ctrl+U: Upload
            Key::Character(c) if c.as_str() == "u" && modifiers.control() => {
                self.update(Message::UploadPressed)
            }

            // Delete: ask to delete the selected item
            Key::Named(keyboard::key::Named::Delete) => match self.view.selected().cloned() {
                Some(item) => self.update(Message::DeletePressed(item)),
                None => Task::none(),
            },

            // F2: rename the selected item
            Key::Named(keyboard::key::Named::F2) => match self.view.selected().cloned() {
                Some(item) => self.update(Message::RenamePressed(item)),
                None => Task::none(),
            },

            // Backspace: parent folder
            Key::Named(keyboard::key::Named::Backspace) => {
                match self.view.trail().parent().map(|c| c.id.clone()) {
                    Some(id) => self.navigate(id),
                    None => Task::none(),
                }
            }

            // Escape: clear selection
            Key::Named(keyboard::key::Named::Escape) => {
                self.view.clear_selection();
                Task::none()
            }

            _ => Task::none(),
        }
    }

    fn view(&self) -> Element<'_, Message> {
        let colors = self.colors();

        let mut body = column![
            self.view_header(),
            horizontal_rule(1),
            self.view_breadcrumbs(),
        ];
        if self.upload_progress.is_active() {
            body = body.push(self.view_upload_progress());
        }
        body = body
            .push(horizontal_rule(1))
            .push(self.view_content())
            .push(self.view_notices());

        let base = container(body)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(move |_| container::Style {
                background: Some(colors.bg_base.into()),
                ..Default::default()
            });

        let overlay: Option<Element<'_, Message>> = match &self.dialog {
            Dialog::Name(dialog) => Some(self.view_name_dialog(dialog)),
            Dialog::ConfirmDelete(item) => Some(self.view_delete_dialog(item)),
            Dialog::None => None,
        };

        if let Some(dialog) = overlay {
            stack![
                base,
                mouse_area(
                    container(Space::new(Length::Fill, Length::Fill))
                        .width(Length::Fill)
                        .height(Length::Fill)
                        .style(|_| container::Style {
                            background: Some(Color::from_rgba(0.0, 0.0, 0.0, 0.5).into()),
                            ..Default::default()
                        })
                )
                .on_press(Message::CloseDialog),
                container(opaque(dialog))
                    .width(Length::Fill)
                    .height(Length::Fill)
                    .center_x(Length::Fill)
                    .center_y(Length::Fill)
            ]
            .into()
        } else if self.drag_active {
            stack![
                base,
                container(text("Drop files here to upload").size(32).color(Color::WHITE))
                    .width(Length::Fill)
                    .height(Length::Fill)
                    .center_x(Length::Fill)
                    .center_y(Length::Fill)
                    .style(|_| container::Style {
                        background: Some(Color::from_rgba(0.0, 0.0, 0.0, 0.5).into()),
                        ..Default::default()
                    })
            ]
            .into()
        } else {
            base.into()
        }
    }

    fn view_header(&self) -> Element<'_, Message> {
        let colors = self.colors();
        let theme_icon = if self.theme_mode == ThemeMode::Dark {
            "🌙"
        } else {
            "☀️"
        };
        let busy = self.upload.is_some();

        let upload_btn = button(text("⬆️ Upload").align_x(alignment::Horizontal::Center))
            .padding([8, 16])
            .style(make_primary_style(colors));
        let upload_btn = if busy {
            upload_btn
        } else {
            upload_btn.on_press(Message::UploadPressed)
        };

        container(
            row![
                text("File Explorer").size(20).color(colors.text_primary),
                horizontal_space(),
                button(text(theme_icon).size(14))
                    .padding([6, 10])
                    .style(make_theme_toggle_style(colors))
                    .on_press(Message::ToggleTheme),
                Space::with_width(10),
                button(text("＋ New Folder").align_x(alignment::Horizontal::Center))
                    .padding([8, 16])
                    .style(make_primary_style(colors))
                    .on_press(Message::NewFolderPressed),
                Space::with_width(10),
                upload_btn,
            ]
            .align_y(Alignment::Center),
        )
        .padding(15)
        .style(move |_| container::Style {
            background: Some(colors.bg_surface.into()),
            ..Default::default()
        })
        .width(Length::Fill)
        .into()
    }

    fn view_breadcrumbs(&self) -> Element<'_, Message> {
        let colors = self.colors();
        let crumbs = self.view.trail().crumbs();
        let mut breadcrumb_row = row![].spacing(2).align_y(Alignment::Center);

        for (i, crumb) in crumbs.iter().enumerate() {
            if i > 0 {
                breadcrumb_row =
                    breadcrumb_row.push(text("/").size(14).color(colors.text_disabled));
            }
            let label = if i == 0 {
                format!("🏠 {}", crumb.name)
            } else {
                crumb.name.clone()
            };

            if i == crumbs.len() - 1 {
                breadcrumb_row = breadcrumb_row.push(
                    container(
                        text(label)
                            .size(14)
                            .font(iced::Font {
                                weight: iced::font::Weight::Bold,
                                ..Default::default()
                            })
                            .color(colors.text_primary),
                    )
                    .padding([2, 6]),
                );
            } else {
                breadcrumb_row = breadcrumb_row.push(
                    button(text(label).size(14))
                        .style(make_breadcrumb_style(colors))
                        .padding([2, 6])
                        .on_press(Message::NavigateTo(crumb.id.clone())),
                );
            }
        }

        container(breadcrumb_row)
            .padding([8, 12])
            .width(Length::Fill)
            .style(move |_| container::Style {
                background: Some(colors.bg_surface.into()),
                ..Default::default()
            })
            .into()
    }

    fn view_upload_progress(&self) -> Element<'_, Message> {
        let colors = self.colors();
        let pct = self.upload_progress.get();
        column![
            text(format!("Uploading: {pct}%"))
                .size(11)
                .color(colors.text_secondary),
            progress_bar(0.0..=100.0, f32::from(pct))
                .height(6)
                .style(make_bar_style(colors)),
        ]
        .spacing(4)
        .padding([6, 16])
        .into()
    }

    fn view_content(&self) -> Element<'_, Message> {
        let colors = self.colors();

        let content: Element<'_, Message> = if self.view.is_loading() {
            container(text("⏳ Loading...").size(16).color(colors.text_secondary))
                .width(Length::Fill)
                .padding(30)
                .center_x(Length::Fill)
                .into()
        } else {
            let list = self.view_file_list();
            match self.view.selected() {
                Some(item) => row![list, vertical_rule(1), self.view_details(item)]
                    .height(Length::Fill)
                    .into(),
                None => list,
            }
        };

        container(content)
            .padding(10)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(move |_| container::Style {
                background: Some(colors.bg_surface.into()),
                ..Default::default()
            })
            .into()
    }

    fn view_file_list(&self) -> Element<'_, Message> {
        let colors = self.colors();
        let children = self.view.children();

        if children.is_empty() {
            return container(text("This folder is empty").color(colors.text_secondary))
                .padding(16)
                .width(Length::Fill)
                .into();
        }

        let list = column(
            children
                .iter()
                .map(|item| {
                    let is_sel = self
                        .view
                        .selected()
                        .map(|i| i.id == item.id)
                        .unwrap_or(false);

                    let mut actions = row![button(text("✏️").size(12))
                        .padding([4, 6])
                        .style(make_icon_btn_style(colors, colors.text_secondary))
                        .on_press(Message::RenamePressed(item.clone()))]
                    .spacing(4)
                    .align_y(Alignment::Center);
                    if !item.is_folder {
                        actions = actions.push(
                            button(text("⬇️").size(12))
                                .padding([4, 6])
                                .style(make_icon_btn_style(colors, colors.text_secondary))
                                .on_press(Message::DownloadPressed(item.clone())),
                        );
                    }
                    actions = actions.push(
                        button(text("🗑️").size(12))
                            .padding([4, 6])
                            .style(make_icon_btn_style(colors, colors.error))
                            .on_press(Message::DeletePressed(item.clone())),
                    );

                    let row_c = row![
                        text(icon_for(item)).size(18),
                        Space::with_width(12),
                        column![
                            text(item.name.clone()).color(colors.text_primary),
                            text(describe(item)).size(11).color(colors.text_secondary),
                        ]
                        .spacing(2),
                        horizontal_space(),
                        actions,
                    ]
                    .align_y(Alignment::Center)
                    .padding([8, 10]);

                    button(row_c)
                        .width(Length::Fill)
                        .style(make_file_item_style(colors, is_sel))
                        .on_press(Message::ItemClicked(item.id.clone()))
                        .into()
                })
                .collect::<Vec<_>>(),
        )
        .spacing(4);

        scrollable(list).height(Length::Fill).width(Length::Fill).into()
    }

    fn view_details<'a>(&'a self, item: &'a Node) -> Element<'a, Message> {
        let colors = self.colors();
        let field = |label: &'a str, value: String| {
            column![
                text(label).size(11).color(colors.text_secondary),
                text(value).size(14).color(colors.text_primary),
            ]
            .spacing(2)
        };

        let mut panel = column![
            text("Details").size(18).color(colors.text_primary),
            horizontal_rule(1),
            row![
                text(icon_for(item)).size(28),
                Space::with_width(12),
                text(item.name.clone()).size(15).color(colors.text_primary),
            ]
            .align_y(Alignment::Center),
            field("Type", type_label(item)),
            field("Size", size_label(item)),
            field("Created", created_label(item).unwrap_or_else(|| "-".to_string())),
        ]
        .spacing(14);

        if !item.is_folder {
            panel = panel.push(
                button(text("⬇️ Download").align_x(alignment::Horizontal::Center))
                    .width(Length::Fill)
                    .padding(10)
                    .style(make_primary_style(colors))
                    .on_press(Message::DownloadPressed(item.clone())),
            );
        }

        container(panel).width(300).padding(16).into()
    }

    fn view_notices(&self) -> Element<'_, Message> {
        let colors = self.colors();
        let notices: Vec<Element<'_, Message>> = self
            .view
            .notices
            .iter()
            .map(|notice| {
                let tint = match notice.kind {
                    NoticeKind::Success => colors.success,
                    NoticeKind::Error => colors.error,
                };
                container(
                    row![
                        text(notice.message.clone()).size(13).color(Color::WHITE),
                        horizontal_space(),
                        button(text("✕").size(11))
                            .padding([2, 6])
                            .style(make_icon_btn_style(colors, Color::WHITE))
                            .on_press(Message::DismissNotice(notice.id)),
                    ]
                    .align_y(Alignment::Center),
                )
                .padding([8, 12])
                .width(360)
                .style(move |_| container::Style {
                    background: Some(tint.into()),
                    border: iced::Border {
                        radius: 4.0.into(),
                        ..Default::default()
                    },
                    ..Default::default()
                })
                .into()
            })
            .collect();

        let content = if notices.is_empty() {
            row![text("Ready").size(12).color(colors.text_secondary)]
        } else {
            row![horizontal_space(), column(notices).spacing(6)]
        };

        container(content)
            .padding(10)
            .style(move |_| container::Style {
                background: Some(colors.bg_base.into()),
                border: iced::Border {
                    color: colors.divider,
                    width: 1.0,
                    ..Default::default()
                },
                ..Default::default()
            })
            .width(Length::Fill)
            .into()
    }

    fn view_name_dialog<'a>(&'a self, dialog: &'a NameDialog) -> Element<'a, Message> {
        let colors = self.colors();
        let (title, label, action) = match &dialog.purpose {
            NamePurpose::CreateFolder => {
                ("Create New Folder".to_string(), "Folder Name", "Create")
            }
            NamePurpose::Rename(item) => {
                let kind = if item.is_folder { "Folder" } else { "File" };
                (format!("Rename {kind}"), "New Name", "Rename")
            }
        };

        let mut input = text_input(label, &dialog.name)
            .id(dialog_input_id())
            .padding(10)
            .style(make_input_style(colors));
        if !dialog.pending {
            input = input
                .on_input(Message::DialogNameChanged)
                .on_submit(Message::DialogSubmit);
        }

        let error: Element<'_, Message> = match &dialog.error {
            Some(e) => text(e.clone()).size(11).color(colors.error).into(),
            None => Space::with_height(0).into(),
        };

        let submit = button(text(action).align_x(alignment::Horizontal::Center))
            .padding([8, 20])
            .style(make_primary_style(colors));
        let submit = if dialog.pending {
            submit
        } else {
            submit.on_press(Message::DialogSubmit)
        };

        self.dialog_frame(
            column![
                text(title).size(16).color(colors.text_primary),
                Space::with_height(15),
                input,
                error,
                Space::with_height(15),
                row![
                    horizontal_space(),
                    button(text("Cancel").align_x(alignment::Horizontal::Center))
                        .padding([8, 20])
                        .style(make_secondary_style(colors))
                        .on_press(Message::CloseDialog),
                    Space::with_width(10),
                    submit,
                ]
            ]
            .padding(20)
            .width(340)
            .into(),
        )
    }

    fn view_delete_dialog<'a>(&'a self, item: &'a Node) -> Element<'a, Message> {
        let colors = self.colors();
        let kind = if item.is_folder { "folder" } else { "file" };
        self.dialog_frame(
            column![
                text("Delete Item").size(16).color(colors.text_primary),
                Space::with_height(12),
                text(format!(
                    "Are you sure you want to delete this {kind}? \"{}\"",
                    item.name
                ))
                .size(13)
                .color(colors.text_secondary),
                Space::with_height(15),
                row![
                    horizontal_space(),
                    button(text("Cancel").align_x(alignment::Horizontal::Center))
                        .padding([8, 20])
                        .style(make_secondary_style(colors))
                        .on_press(Message::CloseDialog),
                    Space::with_width(10),
                    button(text("Delete").align_x(alignment::Horizontal::Center))
                        .padding([8, 20])
                        .style(make_danger_style(colors))
                        .on_press(Message::DeleteConfirmed),
                ]
            ]
            .padding(20)
            .width(340)
            .into(),
        )
    }

    fn dialog_frame<'a>(&self, content: Element<'a, Message>) -> Element<'a, Message> {
        let colors = self.colors();
        container(content)
            .style(move |_| container::Style {
                background: Some(colors.bg_elevated.into()),
                border: iced::Border {
                    color: colors.border_strong,
                    width: 1.0,
                    radius: 8.0.into(),
                },
                shadow: iced::Shadow {
                    color: Color::from_rgba(0.0, 0.0, 0.0, 0.3),
                    offset: iced::Vector::new(0.0, 4.0),
                    blur_radius: 12.0,
                },
                ..Default::default()
            })
            .into()
    }
}

// ============================================================================
// Theme-aware style functions
// ============================================================================

/// Creates a style function for text inputs
fn make_input_style(
    colors: ThemeColors,
) -> impl Fn(&Theme, text_input::Status) -> text_input::Style {
    move |_, _| text_input::Style {
        background: Background::Color(colors.bg_surface),
        border: iced::Border {
            color: colors.border,
            width: 1.0,
            radius: 4.0.into(),
        },
        icon: colors.text_primary,
        placeholder: colors.text_disabled,
        value: colors.text_primary,
        selection: colors.accent,
    }
}

/// Creates a style function for primary buttons (accent colored)
fn make_primary_style(colors: ThemeColors) -> impl Fn(&Theme, button::Status) -> button::Style {
    move |_, s| {
        let base = button::Style {
            background: Some(colors.accent.into()),
            text_color: Color::WHITE,
            border: iced::Border {
                radius: 4.0.into(),
                ..Default::default()
            },
            ..Default::default()
        };
        match s {
            button::Status::Hovered => button::Style {
                background: Some(colors.accent_hover.into()),
                ..base
            },
            button::Status::Pressed => button::Style {
                background: Some(colors.accent_pressed.into()),
                ..base
            },
            button::Status::Disabled => button::Style {
                background: Some(colors.bg_hover.into()),
                text_color: colors.text_disabled,
                ..base
            },
            button::Status::Active => base,
        }
    }
}

/// Creates a style function for secondary buttons
fn make_secondary_style(colors: ThemeColors) -> impl Fn(&Theme, button::Status) -> button::Style {
    move |_, s| {
        let base = button::Style {
            background: Some(colors.bg_elevated.into()),
            text_color: colors.text_primary,
            border: iced::Border {
                color: colors.border,
                width: 1.0,
                radius: 4.0.into(),
            },
            ..Default::default()
        };
        match s {
            button::Status::Hovered => button::Style {
                background: Some(colors.bg_hover.into()),
                ..base
            },
            button::Status::Pressed => button::Style {
                background: Some(colors.bg_selected.into()),
                ..base
            },
            _ => base,
        }
    }
}

/// Creates a style function for the destructive confirmation button
fn make_danger_style(colors: ThemeColors) -> impl Fn(&Theme, button::Status) -> button::Style {
    move |_, s| {
        let base = button::Style {
            background: Some(colors.error.into()),
            text_color: Color::WHITE,
            border: iced::Border {
                radius: 4.0.into(),
                ..Default::default()
            },
            ..Default::default()
        };
        let error_hover = Color::from_rgba(
            (colors.error.r * 1.15).min(1.0),
            (colors.error.g * 1.15).min(1.0),
            (colors.error.b * 1.15).min(1.0),
            1.0,
        );
        let error_pressed = Color::from_rgba(
            colors.error.r * 0.85,
            colors.error.g * 0.85,
            colors.error.b * 0.85,
            1.0,
        );
        match s {
            button::Status::Hovered => button::Style {
                background: Some(error_hover.into()),
                ..base
            },
            button::Status::Pressed => button::Style {
                background: Some(error_pressed.into()),
                ..base
            },
            _ => base,
        }
    }
}

/// Creates a style function for progress bars
fn make_bar_style(colors: ThemeColors) -> impl Fn(&Theme) -> progress_bar::Style {
    move |_| progress_bar::Style {
        background: Background::Color(colors.bg_elevated),
        bar: Background::Color(colors.accent),
        border: iced::Border {
            radius: 2.0.into(),
            ..Default::default()
        },
    }
}

/// Creates a style function for breadcrumb buttons
fn make_breadcrumb_style(colors: ThemeColors) -> impl Fn(&Theme, button::Status) -> button::Style {
    move |_, s| {
        let base = button::Style {
            background: Some(Color::TRANSPARENT.into()),
            text_color: colors.text_secondary,
            border: iced::Border::default(),
            ..Default::default()
        };
        match s {
            button::Status::Hovered => button::Style {
                background: Some(colors.bg_hover.into()),
                text_color: colors.accent_hover,
                border: iced::Border {
                    radius: 3.0.into(),
                    ..Default::default()
                },
                ..base
            },
            _ => base,
        }
    }
}

/// Creates a style function for small icon buttons on list rows and notices
fn make_icon_btn_style(
    colors: ThemeColors,
    tint: Color,
) -> impl Fn(&Theme, button::Status) -> button::Style {
    move |_, s| {
        let base = button::Style {
            background: Some(Color::TRANSPARENT.into()),
            text_color: tint,
            border: iced::Border {
                radius: 12.0.into(),
                ..Default::default()
            },
            ..Default::default()
        };
        match s {
            button::Status::Hovered => button::Style {
                background: Some(Color { a: 0.15, ..colors.text_secondary }.into()),
                ..base
            },
            _ => base,
        }
    }
}

/// Creates a style function for file list items
fn make_file_item_style(
    colors: ThemeColors,
    is_selected: bool,
) -> impl Fn(&Theme, button::Status) -> button::Style {
    move |_, s| {
        let bg = if is_selected {
            colors.bg_selected
        } else if s == button::Status::Hovered {
            colors.bg_hover
        } else {
            Color::TRANSPARENT
        };
        button::Style {
            background: Some(bg.into()),
            text_color: colors.text_primary,
            border: iced::Border {
                radius: 4.0.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

/// Creates a style function for theme toggle button
fn make_theme_toggle_style(
    colors: ThemeColors,
) -> impl Fn(&Theme, button::Status) -> button::Style {
    move |_, s| {
        let base = button::Style {
            background: Some(colors.bg_elevated.into()),
            text_color: colors.text_primary,
            border: iced::Border {
                color: colors.border,
                width: 1.0,
                radius: 4.0.into(),
            },
            ..Default::default()
        };
        match s {
            button::Status::Hovered => button::Style {
                background: Some(colors.bg_hover.into()),
                border: iced::Border {
                    color: colors.accent,
                    width: 1.0,
                    radius: 4.0.into(),
                },
                ..base
            },
            _ => base,
        }
    }
}
