use sockrpc::frame::{Frame, FrameCodec, FrameDecodeError, FrameKind};

#[test]
fn test_rpc_request_layout() {
    let bytes = FrameCodec::encode(&Frame::RpcRequest {
        op_code: 0x0102_0304,
        payload: b"hi",
    });

    assert_eq!(bytes, [0, 0, 0, 0, 1, 2, 3, 4, b'h', b'i']);
}

#[test]
fn test_rpc_reply_has_no_header() {
    let bytes = FrameCodec::encode(&Frame::RpcReply { payload: b"result" });
    assert_eq!(bytes, b"result");

    let frame = FrameCodec::decode(FrameKind::RpcReply, &bytes).unwrap();
    assert_eq!(frame, Frame::RpcReply { payload: b"result" });
}

#[test]
fn test_task_request_layout() {
    let bytes = FrameCodec::encode(&Frame::TaskRequest {
        op_code: 0xAABB_CCDD,
        correlation_id: 7,
        payload: &[9, 9],
    });

    assert_eq!(
        bytes,
        [0, 0, 0, 0, 0xAA, 0xBB, 0xCC, 0xDD, 0, 0, 0, 0, 0, 0, 0, 7, 9, 9]
    );

    let frame = FrameCodec::decode(FrameKind::TaskRequest, &bytes).unwrap();
    assert_eq!(frame.op_code(), Some(0xAABB_CCDD));
    assert_eq!(frame.correlation_id(), Some(7));
    assert_eq!(frame.payload(), &[9, 9]);
}

#[test]
fn test_task_result_layout() {
    let bytes = FrameCodec::encode(&Frame::TaskResult {
        correlation_id: u64::MAX - 1,
        payload: b"ok",
    });

    assert_eq!(&bytes[..8], &(u64::MAX - 1).to_be_bytes());
    assert_eq!(&bytes[8..], b"ok");

    let frame = FrameCodec::decode(FrameKind::TaskResult, &bytes).unwrap();
    assert_eq!(frame.kind(), FrameKind::TaskResult);
    assert_eq!(frame.op_code(), None);
    assert_eq!(frame.correlation_id(), Some(u64::MAX - 1));
}

#[test]
fn test_empty_payload_is_valid() {
    let bytes = FrameCodec::encode(&Frame::RpcRequest {
        op_code: 42,
        payload: &[],
    });
    assert_eq!(bytes.len(), 8);

    let frame = FrameCodec::decode(FrameKind::RpcRequest, &bytes).unwrap();
    assert_eq!(frame.op_code(), Some(42));
    assert!(frame.payload().is_empty());
}

#[test]
fn test_short_buffer_is_rejected() {
    let err = FrameCodec::decode(FrameKind::TaskRequest, &[0; 12]).unwrap_err();
    assert_eq!(
        err,
        FrameDecodeError::IncompleteHeader {
            kind: FrameKind::TaskRequest,
            expected: 16,
            actual: 12,
        }
    );

    assert!(FrameCodec::decode(FrameKind::RpcRequest, &[1, 2, 3]).is_err());
    assert!(FrameCodec::decode(FrameKind::TaskResult, &[]).is_err());
}

#[test]
fn test_decode_borrows_payload_from_buffer() {
    let buf = FrameCodec::encode(&Frame::RpcRequest {
        op_code: 1,
        payload: b"borrowed",
    });
    let frame = FrameCodec::decode(FrameKind::RpcRequest, &buf).unwrap();

    assert!(std::ptr::eq(frame.payload().as_ptr(), buf[8..].as_ptr()));
}
