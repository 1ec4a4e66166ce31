use {
    channel::BoundedChannel,
    std::{sync::Arc, thread},
};

#[test]
fn test_iter_ends_at_close() {
    let channel = BoundedChannel::new(8).unwrap();
    for value in 0..5 {
        channel.push(value).unwrap();
    }
    channel.close();

    let values: Vec<_> = channel.iter().collect();
    assert_eq!(values, vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_iter_is_fused() {
    let channel = BoundedChannel::<u32>::new(2).unwrap();
    channel.close();

    let mut iter = channel.iter();
    assert_eq!(iter.next(), None);
    assert_eq!(iter.next(), None);
}

#[test]
fn test_for_loop_over_shared_channel() {
    let channel = Arc::new(BoundedChannel::new(4).unwrap());
    let producer = thread::spawn({
        let channel = Arc::clone(&channel);
        move || {
            for value in 0..1000u32 {
                channel.push(value).unwrap();
            }
            channel.close();
        }
    });

    let mut expected = 0;
    for value in channel.as_ref() {
        assert_eq!(value, expected);
        expected += 1;
    }
    producer.join().unwrap();
    assert_eq!(expected, 1000);
}

#[test]
fn test_iter_blocks_until_value_arrives() {
    let channel = Arc::new(BoundedChannel::new(2).unwrap());
    let consumer = thread::spawn({
        let channel = Arc::clone(&channel);
        move || channel.iter().next()
    });
    thread::sleep(std::time::Duration::from_millis(20));
    channel.push("frame").unwrap();
    assert_eq!(consumer.join().unwrap(), Some("frame"));
}
