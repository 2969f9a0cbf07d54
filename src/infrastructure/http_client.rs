//! HTTP 传输 - 基础设施层
//!
//! 表单核心逻辑从不自己打开连接，只依赖 [`HttpTransport`] 提供的 GET / POST 能力

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::config::Config;
use crate::error::TransportError;

/// 表单字段（按顺序，允许重复键）
pub type FormFields = Vec<(String, String)>;

/// HTTP 响应
///
/// 只保留表单流程关心的部分：状态码、最终地址（跟随重定向之后）、正文
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub url: String,
    pub body: String,
}

impl HttpResponse {
    /// 是否为 2xx 响应
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP 传输能力
///
/// 职责：
/// - 发送 GET 请求加载表单页面
/// - 发送 `application/x-www-form-urlencoded` 的 POST 请求提交回答
/// - 超时、代理、Cookie 等策略全部由实现方决定
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// 获取页面
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError>;

    /// 以表单编码提交字段
    async fn post_form(&self, url: &str, fields: &[(String, String)])
        -> Result<HttpResponse, TransportError>;
}

/// 基于 reqwest 的默认传输实现
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// 根据配置创建传输（User-Agent、超时）
    pub fn new(config: &Config) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .map_err(|e| TransportError::ClientBuildFailed {
                source: Box::new(e),
            })?;

        Ok(Self { client })
    }

    /// 使用已有的 reqwest 客户端
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn into_response(
        url: &str,
        response: reqwest::Response,
    ) -> Result<HttpResponse, TransportError> {
        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::request_failed(url, e))?;

        debug!("响应 {} ({} 字节): {}", status, body.len(), final_url);

        Ok(HttpResponse {
            status,
            url: final_url,
            body,
        })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TransportError::request_failed(url, e))?;

        Self::into_response(url, response).await
    }

    async fn post_form(
        &self,
        url: &str,
        fields: &[(String, String)],
    ) -> Result<HttpResponse, TransportError> {
        debug!("POST {} ({} 个字段)", url, fields.len());
        let response = self
            .client
            .post(url)
            .form(fields)
            .send()
            .await
            .map_err(|e| TransportError::request_failed(url, e))?;

        Self::into_response(url, response).await
    }
}
