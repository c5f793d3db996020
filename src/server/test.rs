#[cfg(test)]
mod tests {
    use crate::config::ChatConfig;
    use crate::connection::mock::{MockSink, MockStream};
    use crate::server::ChatServer;

    #[tokio::test]
    async fn test_start_uses_config() {
        let config = ChatConfig {
            outbox_capacity: 3,
            ..ChatConfig::default()
        };
        let (server, task) = ChatServer::start(&config);
        assert_eq!(server.outbox_capacity, 3);

        drop(server);
        let registry = task.await.unwrap();
        assert_eq!(registry.client_count(), 0);
    }

    #[tokio::test]
    async fn test_handle_stream_full_lifecycle() {
        let (server, task) = ChatServer::start(&ChatConfig::default());
        let sink = MockSink::default();

        server
            .handle_stream(
                MockStream::new(&["erin", "hi all"]),
                sink.clone(),
                "peer-1".to_string(),
            )
            .await;

        assert_eq!(
            sink.lines(),
            vec!["Enter your name: erin has joined the chat.", "erin: hi all"]
        );
        assert!(sink.is_closed());

        drop(server);
        let registry = task.await.unwrap();
        assert_eq!(registry.client_count(), 0);
        registry.check_invariants().unwrap();
    }

    #[tokio::test]
    async fn test_handle_stream_rejection_is_contained() {
        let (server, task) = ChatServer::start(&ChatConfig::default());
        let sink = MockSink::default();

        server
            .handle_stream(MockStream::new(&[""]), sink.clone(), "peer-2".to_string())
            .await;

        assert!(sink.transcript().ends_with("Name cannot be empty. Disconnecting.\n"));
        drop(server);
        assert_eq!(task.await.unwrap().client_count(), 0);
    }
}
