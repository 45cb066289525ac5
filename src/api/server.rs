//! API服务器状态管理
//! 持有启动时加载的分类器，所有worker只读共享

use crate::config::Config;
use crate::service::RiskClassifier;
use crate::Result;

/// API服务器状态
#[derive(Debug, Clone)]
pub struct ApiServerState {
    /// 风险分类服务，内部已是共享的模型句柄
    pub classifier: RiskClassifier,
}

impl ApiServerState {
    /// 创建新的API服务器状态
    pub fn new(classifier: RiskClassifier) -> Self {
        Self { classifier }
    }

    /// 按配置加载模型并创建状态，失败即启动失败
    pub fn from_config(config: &Config) -> Result<Self> {
        let classifier = RiskClassifier::load(&config.model)?;
        Ok(Self::new(classifier))
    }
}
