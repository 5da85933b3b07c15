//! Media relay between the HTTP upload endpoint and Discord channels.
//!
//! Each staged file is re-sent to the staging channel as an attachment and the
//! CDN URL Discord assigns to it is captured for the result listing. All files
//! of one request are relayed concurrently and awaited jointly; one failed
//! relay fails the whole request. Files that completed before the failure are
//! not retracted from the staging channel.

use std::future::Future;
use std::sync::Arc;

use futures::future;
use serenity::all::{Channel, ChannelId, ChannelType, CreateAttachment, CreateMessage};
use serenity::http::Http;

use crate::{
    error::{upload::UploadError, AppError},
    model::upload::{MediaFile, RelayedFile, UploadRequest},
    service::format::FormattedOutput,
};

/// Relay service around the shared Discord HTTP client.
pub struct MediaRelay {
    http: Arc<Http>,
}

impl MediaRelay {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }

    /// Resolves both destination channels before anything is sent.
    ///
    /// The staging and result channels must both exist and be text-capable;
    /// failing either check rejects the request up front so no file is
    /// relayed toward a dead end.
    ///
    /// # Arguments
    /// - `request` - Parsed upload request carrying both channel IDs
    ///
    /// # Returns
    /// - `Ok((staging, result))` - Resolved channel IDs
    /// - `Err(AppError::UploadErr(InvalidDestination))` - Either ID does not
    ///   resolve to a text-capable channel
    pub async fn resolve_destinations(
        &self,
        request: &UploadRequest,
    ) -> Result<(ChannelId, ChannelId), AppError> {
        let staging = self.resolve_text_channel(request.staging_channel).await?;
        let result = self.resolve_text_channel(request.result_channel).await?;
        Ok((staging, result))
    }

    /// Relays all staged files to the staging channel concurrently.
    ///
    /// Completion order is not guaranteed, but the returned vector pairs each
    /// file with its URL in input order; the formatter re-sorts anyway.
    ///
    /// # Arguments
    /// - `staging` - Resolved staging channel
    /// - `files` - Staged files to forward
    ///
    /// # Returns
    /// - `Ok(Vec<RelayedFile>)` - One entry per input file
    /// - `Err(AppError)` - First relay failure (fail-fast)
    pub async fn relay(
        &self,
        staging: ChannelId,
        files: &[MediaFile],
    ) -> Result<Vec<RelayedFile>, AppError> {
        relay_all(files, |file| self.send_file(staging, file)).await
    }

    /// Posts the formatted listing to the result channel.
    ///
    /// Inline chunks go out as one message each, in order; the attachment
    /// fallback becomes a single message carrying the listing as a text file.
    pub async fn post_output(
        &self,
        result: ChannelId,
        output: FormattedOutput,
    ) -> Result<(), AppError> {
        match output {
            FormattedOutput::Messages(messages) => {
                for (i, text) in messages.iter().enumerate() {
                    let content = if i == 0 {
                        format!("📬 Upload Complete:\n{text}")
                    } else {
                        text.clone()
                    };
                    result
                        .send_message(&self.http, CreateMessage::new().content(content))
                        .await?;
                }
            }
            FormattedOutput::Attachment { filename, content } => {
                result
                    .send_message(
                        &self.http,
                        CreateMessage::new()
                            .content("📬 Upload Complete:")
                            .add_file(CreateAttachment::bytes(content.into_bytes(), filename)),
                    )
                    .await?;
            }
        }

        Ok(())
    }

    async fn resolve_text_channel(&self, id: u64) -> Result<ChannelId, AppError> {
        // ChannelId is non-zero; 0 can never resolve.
        if id == 0 {
            return Err(UploadError::InvalidDestination(id).into());
        }

        let channel = self
            .http
            .get_channel(ChannelId::new(id))
            .await
            .map_err(|_| UploadError::InvalidDestination(id))?;

        match channel {
            Channel::Guild(channel) if is_text_capable(channel.kind) => Ok(channel.id),
            Channel::Private(channel) => Ok(channel.id),
            _ => Err(UploadError::InvalidDestination(id).into()),
        }
    }

    /// Sends one staged file and captures the attachment URL Discord assigned.
    async fn send_file(&self, channel: ChannelId, file: &MediaFile) -> Result<RelayedFile, AppError> {
        let bytes = tokio::fs::read(&file.path).await?;

        let message = channel
            .send_message(
                &self.http,
                CreateMessage::new().add_file(CreateAttachment::bytes(bytes, file.name.clone())),
            )
            .await?;

        let url = message
            .attachments
            .first()
            .map(|attachment| attachment.url.clone())
            .ok_or_else(|| {
                AppError::InternalError(format!(
                    "Relay message for '{}' carries no attachment",
                    file.name
                ))
            })?;

        Ok(RelayedFile {
            name: file.name.clone(),
            url,
        })
    }
}

/// Channel kinds that can receive attachment messages.
fn is_text_capable(kind: ChannelType) -> bool {
    matches!(
        kind,
        ChannelType::Text
            | ChannelType::News
            | ChannelType::PublicThread
            | ChannelType::PrivateThread
            | ChannelType::NewsThread
    )
}

/// Runs one send per file concurrently, fail-fast.
///
/// The returned entries keep the input order independent of completion order.
/// Any single failure fails the batch; sends still in flight are dropped and
/// already-completed sends are not undone.
pub async fn relay_all<'a, F, Fut>(
    files: &'a [MediaFile],
    send: F,
) -> Result<Vec<RelayedFile>, AppError>
where
    F: Fn(&'a MediaFile) -> Fut,
    Fut: Future<Output = Result<RelayedFile, AppError>>,
{
    future::try_join_all(files.iter().map(send)).await
}
