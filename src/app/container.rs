use std::sync::Arc;

use crate::adapters::{
    AppConfig, FfmpegAdapter, FfprobeAdapter, ImageStagingAdapter, NoRevealAdapter,
    SystemRevealAdapter,
};
use crate::app::{convert_interactor::ConvertInteractor, inspect_interactor::InspectInteractor};
use crate::domain::options::OptionTables;
use crate::ports::{EncoderPort, ProbePort, RevealPort, StagingPort};
use crate::probe::ProbeClient;

pub trait AppContainer: Send + Sync {
    fn convert_interactor(&self) -> Arc<ConvertInteractor>;
    fn inspect_interactor(&self) -> Arc<InspectInteractor>;
    fn option_tables(&self) -> &OptionTables;
}

/// Wires the process-backed adapters from the loaded configuration
pub struct DefaultAppContainer {
    convert_interactor: Arc<ConvertInteractor>,
    inspect_interactor: Arc<InspectInteractor>,
    tables: OptionTables,
}

impl DefaultAppContainer {
    pub fn new(config: &AppConfig) -> Self {
        let probe_port: Arc<dyn ProbePort> = Arc::new(FfprobeAdapter::new(
            config.ffprobe_path.clone(),
            config.probe_timeout(),
        ));
        let encoder_port: Arc<dyn EncoderPort> = Arc::new(FfmpegAdapter::new());
        let staging_port: Arc<dyn StagingPort> = Arc::new(ImageStagingAdapter::new());
        let reveal_port: Arc<dyn RevealPort> = if config.reveal_output {
            Arc::new(SystemRevealAdapter::new())
        } else {
            Arc::new(NoRevealAdapter)
        };

        let tables = config.option_tables();
        let probe = ProbeClient::new(Arc::clone(&probe_port));

        let convert_interactor = Arc::new(ConvertInteractor::new(
            probe.clone(),
            encoder_port,
            staging_port,
            reveal_port,
            tables.clone(),
            config.ffmpeg_path.clone(),
        ));
        let inspect_interactor = Arc::new(InspectInteractor::new(probe));

        Self {
            convert_interactor,
            inspect_interactor,
            tables,
        }
    }
}

impl AppContainer for DefaultAppContainer {
    fn convert_interactor(&self) -> Arc<ConvertInteractor> {
        Arc::clone(&self.convert_interactor)
    }

    fn inspect_interactor(&self) -> Arc<InspectInteractor> {
        Arc::clone(&self.inspect_interactor)
    }

    fn option_tables(&self) -> &OptionTables {
        &self.tables
    }
}
