/// Declares a unit type implementing [`RpcMethod`](crate::RpcMethod) whose
/// argument and result are serialized with the default bitcode codec.
///
/// ```rust
/// use bitcode::{Decode, Encode};
/// use sockrpc_service::{RpcMethod, rpc_method};
///
/// #[derive(Encode, Decode, Debug, PartialEq)]
/// pub struct Text {
///     pub value: String,
/// }
///
/// rpc_method!(pub Shout, "demo.ShoutService.Shout", Text => Text);
///
/// let bytes = Shout::encode_request(Text { value: "hi".into() }).unwrap();
/// let decoded = Shout::decode_request(&bytes).unwrap();
/// assert_eq!(decoded.value, "hi");
/// assert_eq!(Shout::OP_CODE, sockrpc_service::op_code("demo.ShoutService.Shout"));
/// ```
#[macro_export]
macro_rules! rpc_method {
    ($(#[$meta:meta])* $vis:vis $name:ident, $full_name:literal, $input:ty => $output:ty) => {
        $(#[$meta])*
        $vis struct $name;

        impl $crate::RpcMethod for $name {
            const FULL_NAME: &'static str = $full_name;

            type Input = $input;
            type Output = $output;

            fn encode_request(input: Self::Input) -> ::std::result::Result<::std::vec::Vec<u8>, ::std::io::Error> {
                $crate::encode(&input)
            }

            fn decode_request(bytes: &[u8]) -> ::std::result::Result<Self::Input, ::std::io::Error> {
                $crate::decode(bytes)
            }

            fn encode_response(output: Self::Output) -> ::std::result::Result<::std::vec::Vec<u8>, ::std::io::Error> {
                $crate::encode(&output)
            }

            fn decode_response(bytes: &[u8]) -> ::std::result::Result<Self::Output, ::std::io::Error> {
                $crate::decode(bytes)
            }
        }
    };
}
