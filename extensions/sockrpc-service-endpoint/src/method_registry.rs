use crate::responder::{ReplyRoute, Responder};
use crate::Service;
use sockrpc::OpCode;
use sockrpc_service::{MethodDescriptor, RpcMethod};
use std::collections::HashMap;
use std::io;
use std::mem;
use std::sync::Arc;

type MethodHandler = Box<dyn Fn(&[u8], ReplyRoute) -> Result<(), io::Error> + Send + Sync>;

/// A method bound to a handler, as stored in a [`MethodRegistry`].
pub struct RegisteredMethod {
    descriptor: MethodDescriptor,
    handler: MethodHandler,
}

impl RegisteredMethod {
    pub fn descriptor(&self) -> &MethodDescriptor {
        &self.descriptor
    }

    pub fn op_code(&self) -> OpCode {
        self.descriptor.op_code
    }

    /// Decodes `payload` and runs the handler. A decode failure is returned
    /// without the handler ever seeing the request.
    pub(crate) fn invoke(&self, payload: &[u8], route: ReplyRoute) -> Result<(), io::Error> {
        (self.handler)(payload, route)
    }
}

/// Op-code to handler table of one listener. Built once through
/// [`MethodRegistryBuilder`], read-only afterwards.
pub struct MethodRegistry {
    methods: HashMap<OpCode, RegisteredMethod>,
}

impl MethodRegistry {
    pub fn builder() -> MethodRegistryBuilder {
        MethodRegistryBuilder::default()
    }

    pub fn get(&self, op_code: OpCode) -> Option<&RegisteredMethod> {
        self.methods.get(&op_code)
    }

    pub fn contains(&self, op_code: OpCode) -> bool {
        self.methods.contains_key(&op_code)
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &MethodDescriptor> {
        self.methods.values().map(RegisteredMethod::descriptor)
    }
}

#[derive(Default)]
pub struct MethodRegistryBuilder {
    methods: HashMap<OpCode, RegisteredMethod>,
}

impl MethodRegistryBuilder {
    /// Binds `handler` to `M`'s op-code.
    ///
    /// Op-codes are 32-bit hashes and collisions are not detected: if the
    /// op-code is already bound, the new handler silently takes its place
    /// (a warning is logged naming both methods).
    pub fn register<M, F>(&mut self, handler: F) -> &mut Self
    where
        M: RpcMethod + 'static,
        F: Fn(M::Input, Responder<M::Output>) + Send + Sync + 'static,
    {
        let descriptor = MethodDescriptor::of::<M>();
        let handler: MethodHandler = Box::new(move |payload: &[u8], route: ReplyRoute| {
            let input = M::decode_request(payload)?;
            handler(input, Responder::new(route, M::encode_response));
            Ok(())
        });

        if let Some(replaced) = self
            .methods
            .insert(descriptor.op_code, RegisteredMethod { descriptor, handler })
        {
            tracing::warn!(
                "{} replaces {} (both hash to op-code {:#010x})",
                descriptor.full_name,
                replaced.descriptor.full_name,
                descriptor.op_code
            );
        }

        self
    }

    /// Binds a plain function whose return value is the reply.
    pub fn register_fn<M, F>(&mut self, f: F) -> &mut Self
    where
        M: RpcMethod + 'static,
        F: Fn(M::Input) -> M::Output + Send + Sync + 'static,
    {
        self.register::<M, _>(move |input, responder| {
            if let Err(err) = responder.respond(f(input)) {
                tracing::warn!("failed to reply to {}: {}", M::FULL_NAME, err);
            }
        })
    }

    /// Lets `service` register all of its methods.
    pub fn register_service<S: Service>(&mut self, service: Arc<S>) -> &mut Self {
        tracing::debug!("registering service {}", S::NAME);
        service.register_methods(self);
        self
    }

    /// Freezes the registered methods. The builder is left empty.
    pub fn build(&mut self) -> MethodRegistry {
        MethodRegistry {
            methods: mem::take(&mut self.methods),
        }
    }
}
