use crate::MessageString;
use sockrpc_service::RpcMethod;
use std::io;

pub struct Echo;

impl RpcMethod for Echo {
    const FULL_NAME: &'static str = "messaging.EchoService.Echo";

    type Input = MessageString;
    type Output = MessageString;

    fn encode_request(input: Self::Input) -> Result<Vec<u8>, io::Error> {
        sockrpc_service::encode(&input)
    }

    fn decode_request(bytes: &[u8]) -> Result<Self::Input, io::Error> {
        sockrpc_service::decode(bytes)
    }

    fn encode_response(output: Self::Output) -> Result<Vec<u8>, io::Error> {
        sockrpc_service::encode(&output)
    }

    fn decode_response(bytes: &[u8]) -> Result<Self::Output, io::Error> {
        sockrpc_service::decode(bytes)
    }
}
