//! Runs alone in its own test binary: the live-channel count is process-wide.

use xpipe::{channel_with_config, open_channels, ChannelConfig, ErrorKind};

#[test]
fn test_live_channel_limit() {
    let config = ChannelConfig::new().with_capacity(16).with_max_open_channels(2);
    assert_eq!(open_channels(), 0);

    let (tx1, rx1) = channel_with_config(&config).unwrap();
    let (tx2, rx2) = channel_with_config(&config).unwrap();
    assert_eq!(open_channels(), 2);

    let err = channel_with_config(&config).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ResourceExhausted);

    // one closed end keeps the channel alive
    tx1.close();
    assert_eq!(open_channels(), 2);
    assert!(channel_with_config(&config).is_err());

    rx1.close();
    assert_eq!(open_channels(), 1);
    let (tx3, rx3) = channel_with_config(&config).unwrap();

    // explicit close followed by drop only releases once
    tx2.close();
    rx2.close();
    drop(tx2);
    drop(rx2);
    drop(tx1);
    drop(rx1);
    assert_eq!(open_channels(), 1);

    drop((tx3, rx3));
    assert_eq!(open_channels(), 0);

    let err = channel_with_config(&ChannelConfig::new().with_capacity(0)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}
