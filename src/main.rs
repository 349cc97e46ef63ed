use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{info, warn};

use mvvm_navigation::mvvm::{BaseView, ResultProvider, ResultSlot, Size, UiAction, ViewModel, ViewModelCore};
use mvvm_navigation::navigation::{
    DesktopLifetime, NavigationController, OverlayHost, OverlayLayer, ServiceCollection, TopLevel,
    Window, WindowHost,
};
use mvvm_navigation::NavigationConfig;

#[derive(Default)]
struct HomeViewModel {
    core: ViewModelCore,
}

impl ViewModel for HomeViewModel {
    fn core(&self) -> &ViewModelCore {
        &self.core
    }
}

#[derive(Default)]
struct SettingsViewModel {
    core: ViewModelCore,
}

impl ViewModel for SettingsViewModel {
    fn core(&self) -> &ViewModelCore {
        &self.core
    }

    fn attach_handlers(&self) {
        info!("Settings screen is live");
    }
}

/// Asks for a new profile name
#[derive(Default)]
struct RenameViewModel {
    core: ViewModelCore,
    name: ResultSlot<String>,
}

impl RenameViewModel {
    fn submit(&self, name: &str) -> bool {
        self.name.try_set(name.to_string())
    }
}

impl ViewModel for RenameViewModel {
    fn core(&self) -> &ViewModelCore {
        &self.core
    }
}

#[async_trait]
impl ResultProvider<String> for RenameViewModel {
    async fn get_result(&self) -> anyhow::Result<String> {
        Ok(self.name.wait().await?)
    }
}

async fn wait_for_overlay(layer: &OverlayLayer) -> OverlayHost {
    loop {
        if let Some(host) = layer.children().pop() {
            return host;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let config = NavigationConfig::load().unwrap_or_else(|e| {
        warn!("Ignoring navigation config: {:#}", e);
        NavigationConfig::default()
    });

    let mut services = ServiceCollection::new();
    services
        .add_default::<HomeViewModel>()
        .add_default::<SettingsViewModel>()
        .add_default::<RenameViewModel>();

    let window = Window::new(TopLevel::new(Size::new(1280, 800)));
    let layer = window
        .top_level()
        .overlay_layer()
        .context("Main window has no overlay layer")?;
    let host = WindowHost::new(DesktopLifetime::with_main_window(window));

    let controller = NavigationController::with_config(host, services.into_provider(), config);
    controller.register_views::<BaseView<HomeViewModel>, HomeViewModel>();
    controller.register_views::<BaseView<SettingsViewModel>, SettingsViewModel>();
    controller.register_views::<BaseView<RenameViewModel>, RenameViewModel>();

    controller.navigate_to::<HomeViewModel>().await?;
    controller.navigate_to::<SettingsViewModel>().await?;
    info!("📚 History depth after two screens: {}", controller.history_depth().await?);

    let settings = controller
        .get_view_model::<SettingsViewModel>()
        .context("Settings view-model missing")?;
    settings.core().go_back().await?;
    info!("📚 History depth after going back: {}", controller.history_depth().await?);

    let selector = {
        let layer = layer.clone();
        tokio::spawn(async move {
            let host = wait_for_overlay(&layer).await;
            if let Some(dialog) = host.dialog() {
                info!("💬 {}: {}", dialog.title(), dialog.description());
                dialog.select_title("Keep");
            }
        })
    };
    let choice = controller
        .ask_for_action(
            "Unsaved changes",
            "Keep editing or discard?",
            vec![
                UiAction::new("Keep").with_command(|_| info!("Keeping changes")),
                UiAction::new("Discard"),
            ],
        )
        .await?;
    selector.await?;
    if let Some(action) = choice {
        info!("✅ Picked '{}'", action.title);
        action.execute();
    }

    let rename = controller
        .get_view_model::<RenameViewModel>()
        .context("Rename view-model missing")?;
    let typist = {
        let layer = layer.clone();
        let rename = rename.clone();
        tokio::spawn(async move {
            let host = wait_for_overlay(&layer).await;
            if let Some(max) = host.view().and_then(|view| view.view().max_size()) {
                info!("📐 Rename view bounded to {}x{}", max.width, max.height);
            }
            rename.submit("workstation");
        })
    };
    let name = controller.show_for_result::<RenameViewModel, String>().await?;
    typist.await?;
    info!("✅ Renamed profile to '{}' ({} overlays left)", name, layer.len());

    Ok(())
}
